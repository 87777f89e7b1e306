use serde::{Deserialize, Serialize};

/// The authenticated identity returned by login/register.
///
/// Persisted as JSON under the `authUser` key. The persisted shape is checked
/// field by field on restore (see [`crate::session::decode_session`]); the serde
/// derives here are only used for the wire and for writing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub token: String,
}

/// A catalog movie as returned by movie search and movie lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub primary_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<i64>,
}

impl Movie {
    /// Builds the minimal movie payload carried to the information screen when
    /// the catalog lookup for a rated item fails.
    pub fn fallback_for(item: &UserMovie) -> Self {
        Self {
            id: item.movie_id,
            primary_title: item.movie_title.clone(),
            original_title: None,
            start_year: None,
            poster_url: item.poster_url.clone(),
            aggregate_rating: None,
            vote_count: None,
        }
    }
}

/// A public user record (search results, followees, list owners).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// A movie in someone's list together with their rating and review.
///
/// `rating` is `None` (unrated) or a half-point value in `[0, 5]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMovie {
    pub movie_id: i64,
    #[serde(default)]
    pub movie_title: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

impl UserMovie {
    /// True when the review carries any non-whitespace text.
    pub fn has_review(&self) -> bool {
        self.review.as_deref().is_some_and(|r| !r.trim().is_empty())
    }
}

/// One entry of the "latest ratings" trending feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentRating {
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    pub rated_at: String,
    pub rated_by: String,
}

/// One entry of the "top rated" trending feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRated {
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    pub average_rating: f64,
    pub rating_count: i64,
}

/// Credentials sent to `POST /api/auth/login`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

/// New account sent to `POST /api/auth/register`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
}

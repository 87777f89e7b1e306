//! reqwest-backed [`ApiClient`].
//!
//! Status and body handling is centralised in [`HttpApi::send`] and friends:
//! connect/timeout failures become [`ApiError::Transport`], non-2xx answers
//! become [`ApiError::Rejected`] carrying the server's `message` when the body
//! has one, and list endpoints that answer with anything but a JSON array decode
//! to an empty list.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::types::{
    LoginPayload, Movie, RecentRating, RegisterPayload, Session, TopRated, User, UserMovie,
};

/// Default request timeout when the caller does not configure one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// Builds a client rooted at `base_url` (e.g. `http://localhost:8080`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the TLS backend cannot be initialised.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends `request` and returns the raw body of a successful response.
    async fn send_raw(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "request rejected");
            return Err(rejection(status.as_u16(), &body));
        }
        Ok(body.to_vec())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(request).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_list<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, ApiError> {
        let body = self.send_raw(request).await?;
        decode_sequence(&body)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send_raw(request).await.map(|_| ())
    }
}

/// Builds the `Rejected` error for a non-success response body.
///
/// The message is taken from a JSON `message` (or `error`) string field when the
/// body has one; anything else leaves it empty so the generic text is shown.
pub fn rejection(status: u16, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<Value>(body).ok().and_then(|v| {
        ["message", "error"]
            .iter()
            .find_map(|k| v.get(k).and_then(Value::as_str).map(str::to_owned))
    });
    ApiError::Rejected { status, message }
}

/// Decodes a list body. A body that is valid JSON but not an array (including
/// `null`) yields an empty list; a malformed array element is a decode error.
pub fn decode_sequence<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string())),
        _ => Ok(Vec::new()),
    }
}

#[async_trait]
impl ApiClient for HttpApi {
    async fn login(&self, payload: &LoginPayload) -> Result<Session, ApiError> {
        self.send(self.client.post(self.url("/api/auth/login")).json(payload)).await
    }

    async fn register(&self, payload: &RegisterPayload) -> Result<Session, ApiError> {
        self.send(self.client.post(self.url("/api/auth/register")).json(payload)).await
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>, ApiError> {
        let request = self.client.get(self.url("/api/movies/search")).query(&[("q", query)]);
        self.send_list(request).await
    }

    async fn movie(&self, movie_id: i64) -> Result<Movie, ApiError> {
        self.send(self.client.get(self.url(&format!("/api/movies/{movie_id}")))).await
    }

    async fn user(&self, user_id: i64, token: Option<&str>) -> Result<User, ApiError> {
        let request = self.client.get(self.url(&format!("/api/users/{user_id}")));
        self.send(Self::authed(request, token)).await
    }

    async fn search_users(&self, query: &str, token: Option<&str>) -> Result<Vec<User>, ApiError> {
        let request = self
            .client
            .get(self.url("/api/users/search"))
            .query(&[("username", query)]);
        self.send_list(Self::authed(request, token)).await
    }

    async fn following(&self, user_id: i64, token: &str) -> Result<Vec<User>, ApiError> {
        let request = self.client.get(self.url(&format!("/api/users/{user_id}/following")));
        self.send_list(request.bearer_auth(token)).await
    }

    async fn follow(&self, viewer_id: i64, target_id: i64, token: &str) -> Result<User, ApiError> {
        let request = self
            .client
            .post(self.url(&format!("/api/users/{viewer_id}/follow/{target_id}")));
        self.send(request.bearer_auth(token)).await
    }

    async fn unfollow(&self, viewer_id: i64, target_id: i64, token: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.url(&format!("/api/users/{viewer_id}/follow/{target_id}")));
        self.send_empty(request.bearer_auth(token)).await
    }

    async fn user_movies(
        &self,
        user_id: i64,
        token: Option<&str>,
    ) -> Result<Vec<UserMovie>, ApiError> {
        let request = self.client.get(self.url(&format!("/api/user-movies/{user_id}")));
        self.send_list(Self::authed(request, token)).await
    }

    async fn upsert_user_movie(
        &self,
        user_id: i64,
        movie_id: i64,
        rating: Option<f64>,
        review: Option<&str>,
        token: &str,
    ) -> Result<UserMovie, ApiError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(rating) = rating {
            params.push(("rating", rating.to_string()));
        }
        if let Some(review) = review {
            params.push(("review", review.to_owned()));
        }
        let request = self
            .client
            .post(self.url(&format!("/api/user-movies/{user_id}/{movie_id}")))
            .query(&params)
            .bearer_auth(token);
        self.send(request).await
    }

    async fn delete_user_movie(
        &self,
        user_id: i64,
        movie_id: i64,
        token: &str,
    ) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.url(&format!("/api/user-movies/{user_id}/{movie_id}")));
        self.send_empty(request.bearer_auth(token)).await
    }

    async fn trending_latest(&self) -> Result<Vec<RecentRating>, ApiError> {
        self.send_list(self.client.get(self.url("/api/trending/latest"))).await
    }

    async fn trending_top(&self) -> Result<Vec<TopRated>, ApiError> {
        self.send_list(self.client.get(self.url("/api/trending/top"))).await
    }
}

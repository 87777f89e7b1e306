//! Add-to-list / rate form.

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::types::{Movie, Session, UserMovie};

pub const MOVIE_NOT_FOUND_MESSAGE: &str = "Movie not found.";
pub const SIGN_IN_REQUIRED_MESSAGE: &str = "You need to be signed in to add a movie to your list.";
pub const MAX_RATING: f64 = 5.0;
pub const RATING_STEP: f64 = 0.5;

/// Checks a rating from the form. `0` means "no rating".
///
/// # Errors
///
/// Returns `ApiError::Validation` for values outside `[0, 5]` or not on a
/// half-point step.
pub fn validate_rating(value: f64) -> Result<Option<f64>, ApiError> {
    if !value.is_finite() || !(0.0..=MAX_RATING).contains(&value) {
        return Err(ApiError::validation("Rating must be between 0 and 5."));
    }
    if (value / RATING_STEP).fract() != 0.0 {
        return Err(ApiError::validation("Rating must be in steps of 0.5."));
    }
    Ok((value > 0.0).then_some(value))
}

/// Saves a rating/review for one movie.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingCommand {
    pub user_id: i64,
    pub movie_id: i64,
    pub rating: Option<f64>,
    pub review: Option<String>,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct RatingOutcome {
    pub user_id: i64,
    pub result: Result<UserMovie, ApiError>,
}

impl RatingCommand {
    pub async fn execute(self, api: &dyn ApiClient) -> RatingOutcome {
        let result = api
            .upsert_user_movie(
                self.user_id,
                self.movie_id,
                self.rating,
                self.review.as_deref(),
                &self.token,
            )
            .await;
        RatingOutcome { user_id: self.user_id, result }
    }
}

#[derive(Debug, Default)]
pub struct RatingForm {
    movie: Option<Movie>,
    rating: f64,
    review: String,
    submitting: bool,
    error: Option<String>,
    saved: bool,
}

impl RatingForm {
    /// Opens the form for `movie`. A missing movie or session is reported in
    /// [`RatingForm::error`] and blocks submission.
    pub fn open(movie: Option<Movie>, session: Option<&Session>) -> Self {
        let error = match (&movie, session) {
            (None, _) => Some(MOVIE_NOT_FOUND_MESSAGE.to_owned()),
            (Some(_), None) => Some(SIGN_IN_REQUIRED_MESSAGE.to_owned()),
            _ => None,
        };
        Self { movie, error, ..Self::default() }
    }

    /// Pre-fills from an existing list entry.
    pub fn with_existing(mut self, item: &UserMovie) -> Self {
        self.rating = item.rating.unwrap_or(0.0);
        self.review = item.review.clone().unwrap_or_default();
        self
    }

    pub fn set_rating(&mut self, value: f64) {
        self.rating = value;
    }

    /// Moves the rating by `steps` half-points, staying in `[0, 5]`.
    pub fn step_rating(&mut self, steps: i32) {
        let next = self.rating + f64::from(steps) * RATING_STEP;
        self.rating = next.clamp(0.0, MAX_RATING);
    }

    pub fn review_mut(&mut self) -> &mut String {
        &mut self.review
    }

    /// Validates and builds the save request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the form is already submitting, has
    /// no movie or session, or holds an invalid rating. The message is also
    /// recorded in [`RatingForm::error`].
    pub fn submit(&mut self, session: Option<&Session>) -> Result<RatingCommand, ApiError> {
        let result = self.build(session);
        match &result {
            Ok(_) => {
                self.submitting = true;
                self.error = None;
            }
            Err(e) if self.submitting => {
                tracing::debug!(error = %e, "ignored double submission");
            }
            Err(e) => self.error = Some(e.user_message()),
        }
        result
    }

    fn build(&self, session: Option<&Session>) -> Result<RatingCommand, ApiError> {
        if self.submitting {
            return Err(ApiError::validation("Already saving."));
        }
        let movie = self
            .movie
            .as_ref()
            .ok_or_else(|| ApiError::validation(MOVIE_NOT_FOUND_MESSAGE))?;
        let session = session.ok_or_else(|| ApiError::validation(SIGN_IN_REQUIRED_MESSAGE))?;
        let rating = validate_rating(self.rating)?;
        let review = self.review.trim();
        Ok(RatingCommand {
            user_id: session.id,
            movie_id: movie.id,
            rating,
            review: (!review.is_empty()).then(|| review.to_owned()),
            token: session.token.clone(),
        })
    }

    /// Applies the save result. Returns the saved entry on success so the
    /// caller can patch it into the owner's list.
    pub fn apply(&mut self, outcome: RatingOutcome) -> Option<UserMovie> {
        self.submitting = false;
        match outcome.result {
            Ok(item) => {
                self.saved = true;
                self.error = None;
                Some(item)
            }
            Err(e) => {
                tracing::warn!(error = %e, "saving rating failed");
                self.error = Some(e.user_message());
                None
            }
        }
    }

    pub fn movie(&self) -> Option<&Movie> {
        self.movie.as_ref()
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn review(&self) -> &str {
        &self.review
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie() -> Movie {
        Movie {
            id: 42,
            primary_title: "Alien".into(),
            original_title: None,
            start_year: Some(1979),
            poster_url: None,
            aggregate_rating: None,
            vote_count: None,
        }
    }

    fn session() -> Session {
        Session { id: 7, username: "ana".into(), email: "ana@example.com".into(), token: "tok".into() }
    }

    #[test]
    fn rating_must_be_a_half_step_in_range() {
        assert_eq!(validate_rating(0.0), Ok(None));
        assert_eq!(validate_rating(3.5), Ok(Some(3.5)));
        assert_eq!(validate_rating(5.0), Ok(Some(5.0)));
        assert!(validate_rating(3.3).is_err());
        assert!(validate_rating(-0.5).is_err());
        assert!(validate_rating(5.5).is_err());
        assert!(validate_rating(f64::NAN).is_err());
    }

    #[test]
    fn open_without_session_reports_sign_in() {
        let form = RatingForm::open(Some(movie()), None);
        assert_eq!(form.error(), Some(SIGN_IN_REQUIRED_MESSAGE));
        let form = RatingForm::open(None, Some(&session()));
        assert_eq!(form.error(), Some(MOVIE_NOT_FOUND_MESSAGE));
    }

    #[test]
    fn blank_review_is_sent_as_absent() {
        let mut form = RatingForm::open(Some(movie()), Some(&session()));
        form.set_rating(4.0);
        form.review_mut().push_str("   ");
        let command = form.submit(Some(&session())).unwrap();
        assert_eq!(command.rating, Some(4.0));
        assert_eq!(command.review, None);
        assert_eq!(command.movie_id, 42);
    }

    #[test]
    fn second_submit_is_rejected_while_saving() {
        let mut form = RatingForm::open(Some(movie()), Some(&session()));
        assert!(form.submit(Some(&session())).is_ok());
        assert!(form.submit(Some(&session())).is_err());
        assert!(form.error().is_none());

        let saved = form.apply(RatingOutcome {
            user_id: 7,
            result: Ok(UserMovie {
                movie_id: 42,
                movie_title: "Alien".into(),
                rating: None,
                review: None,
                poster_url: None,
            }),
        });
        assert!(saved.is_some());
        assert!(form.is_saved());
        assert!(!form.is_submitting());
    }

    #[test]
    fn step_rating_stays_in_range() {
        let mut form = RatingForm::open(Some(movie()), Some(&session()));
        form.step_rating(-1);
        assert_eq!(form.rating(), 0.0);
        form.step_rating(13);
        assert_eq!(form.rating(), 5.0);
    }
}

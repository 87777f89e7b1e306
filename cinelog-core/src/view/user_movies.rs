//! One user's rated movie list.
//!
//! The list and the owner's display name are loaded together. Each [`open`]
//! bumps a load generation, so when the user navigates from one list to another
//! quickly, only the last list opened is ever shown.
//!
//! [`open`]: UserMoviesView::open

use std::collections::HashSet;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::nav::MovieLookup;
use crate::sort::SortMode;
use crate::types::{Session, User, UserMovie};
use crate::view::ListView;

pub const DELETE_FAILED_MESSAGE: &str = "Unable to remove this movie right now.";

/// Fetches a user's list and profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMoviesRequest {
    pub generation: u64,
    pub user_id: i64,
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserMoviesLoaded {
    pub generation: u64,
    pub user_id: i64,
    pub movies: Result<Vec<UserMovie>, ApiError>,
    pub user: Result<User, ApiError>,
}

impl UserMoviesRequest {
    pub async fn execute(self, api: &dyn ApiClient) -> UserMoviesLoaded {
        let token = self.token.as_deref();
        let (movies, user) = futures::join!(
            api.user_movies(self.user_id, token),
            api.user(self.user_id, token)
        );
        UserMoviesLoaded { generation: self.generation, user_id: self.user_id, movies, user }
    }
}

/// Removes one movie from the owner's list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCommand {
    pub user_id: i64,
    pub movie_id: i64,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    pub user_id: i64,
    pub movie_id: i64,
    pub result: Result<(), ApiError>,
}

impl DeleteCommand {
    pub async fn execute(self, api: &dyn ApiClient) -> DeleteOutcome {
        let result = api.delete_user_movie(self.user_id, self.movie_id, &self.token).await;
        DeleteOutcome { user_id: self.user_id, movie_id: self.movie_id, result }
    }
}

pub struct UserMoviesView {
    viewing: Option<i64>,
    username: Option<String>,
    list: ListView<UserMovie>,
    expanded_reviews: HashSet<i64>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl UserMoviesView {
    pub fn new(page_size: usize) -> Self {
        Self {
            viewing: None,
            username: None,
            list: ListView::new(page_size),
            expanded_reviews: HashSet::new(),
            loading: false,
            error: None,
            generation: 0,
        }
    }

    /// Starts showing `user_id`'s list. Sort, page, and expanded reviews reset.
    pub fn open(&mut self, user_id: i64, session: Option<&Session>) -> UserMoviesRequest {
        self.generation += 1;
        self.viewing = Some(user_id);
        self.username = None;
        self.list.clear();
        self.list.set_sort(SortMode::Original);
        self.expanded_reviews.clear();
        self.loading = true;
        self.error = None;
        tracing::debug!(user_id, generation = self.generation, "loading user movies");
        UserMoviesRequest {
            generation: self.generation,
            user_id,
            token: session.map(|s| s.token.clone()),
        }
    }

    /// Reloads the current list, if one is open.
    pub fn reload(&mut self, session: Option<&Session>) -> Option<UserMoviesRequest> {
        let user_id = self.viewing?;
        Some(self.open(user_id, session))
    }

    /// Forgets the current list.
    pub fn close(&mut self) {
        self.generation += 1;
        self.viewing = None;
        self.username = None;
        self.list.clear();
        self.expanded_reviews.clear();
        self.loading = false;
        self.error = None;
    }

    pub fn apply_loaded(&mut self, loaded: UserMoviesLoaded) -> bool {
        if loaded.generation != self.generation {
            tracing::debug!(generation = loaded.generation, "dropping stale user movies");
            return false;
        }
        self.loading = false;
        match loaded.movies {
            Ok(movies) => {
                self.list.replace(movies);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(user_id = loaded.user_id, error = %e, "could not load user movies");
                self.list.clear();
                self.error = Some(e.user_message());
            }
        }
        match loaded.user {
            Ok(user) => self.username = Some(user.username),
            Err(e) => tracing::debug!(user_id = loaded.user_id, error = %e, "username lookup failed"),
        }
        self.list.set_sort(SortMode::Original);
        true
    }

    /// True when the signed-in viewer owns the list on screen.
    pub fn is_owner(&self, session: Option<&Session>) -> bool {
        matches!((self.viewing, session), (Some(id), Some(s)) if s.id == id)
    }

    /// Builds a delete for `movie_id`. Only the owner may delete.
    pub fn delete(&mut self, movie_id: i64, session: Option<&Session>) -> Option<DeleteCommand> {
        if !self.is_owner(session) {
            return None;
        }
        let session = session?;
        Some(DeleteCommand { user_id: session.id, movie_id, token: session.token.clone() })
    }

    /// Removes the movie once the server confirms. Failures leave the list as is.
    pub fn apply_delete(&mut self, outcome: DeleteOutcome) {
        if self.viewing != Some(outcome.user_id) {
            return;
        }
        match outcome.result {
            Ok(()) => {
                self.list.remove_where(|m| m.movie_id == outcome.movie_id);
                self.expanded_reviews.remove(&outcome.movie_id);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(movie_id = outcome.movie_id, error = %e, "delete failed");
                self.error = Some(DELETE_FAILED_MESSAGE.to_owned());
            }
        }
    }

    /// Patches a saved rating into the list if it belongs to the list on screen.
    pub fn apply_rating(&mut self, owner_id: i64, item: UserMovie) {
        if self.viewing != Some(owner_id) {
            return;
        }
        let movie_id = item.movie_id;
        self.list.upsert(item, |m| m.movie_id == movie_id);
    }

    pub fn can_toggle_review(&self, movie_id: i64) -> bool {
        self.list.items().iter().any(|m| m.movie_id == movie_id && m.has_review())
    }

    pub fn toggle_review(&mut self, movie_id: i64) {
        if !self.can_toggle_review(movie_id) {
            return;
        }
        if !self.expanded_reviews.remove(&movie_id) {
            self.expanded_reviews.insert(movie_id);
        }
    }

    pub fn review_expanded(&self, movie_id: i64) -> bool {
        self.expanded_reviews.contains(&movie_id)
    }

    pub fn info_lookup(&self, item: &UserMovie) -> MovieLookup {
        MovieLookup::for_item(item)
    }

    pub fn viewing(&self) -> Option<i64> {
        self.viewing
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn list(&self) -> &ListView<UserMovie> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<UserMovie> {
        &mut self.list
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Default for UserMoviesView {
    fn default() -> Self {
        Self::new(crate::view::DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: i64) -> Session {
        Session { id, username: "ana".into(), email: "ana@example.com".into(), token: "tok".into() }
    }

    fn movie(id: i64, review: Option<&str>) -> UserMovie {
        UserMovie {
            movie_id: id,
            movie_title: format!("movie {id}"),
            rating: None,
            review: review.map(str::to_owned),
            poster_url: None,
        }
    }

    fn loaded(generation: u64, user_id: i64, movies: Vec<UserMovie>) -> UserMoviesLoaded {
        UserMoviesLoaded {
            generation,
            user_id,
            movies: Ok(movies),
            user: Err(ApiError::Transport("down".into())),
        }
    }

    #[test]
    fn only_the_last_opened_list_is_applied() {
        let mut view = UserMoviesView::default();
        let first = view.open(1, None);
        let second = view.open(2, None);

        assert!(view.apply_loaded(loaded(second.generation, 2, vec![movie(20, None)])));
        assert!(!view.apply_loaded(loaded(first.generation, 1, vec![movie(10, None)])));
        assert_eq!(view.list().items()[0].movie_id, 20);
        assert_eq!(view.viewing(), Some(2));
    }

    #[test]
    fn username_failure_is_tolerated() {
        let mut view = UserMoviesView::default();
        let request = view.open(1, None);
        assert!(view.apply_loaded(loaded(request.generation, 1, vec![movie(1, None)])));
        assert_eq!(view.username(), None);
        assert_eq!(view.error(), None);
        assert_eq!(view.list().len(), 1);
    }

    #[test]
    fn only_the_owner_can_delete() {
        let mut view = UserMoviesView::default();
        view.open(1, None);
        assert!(view.delete(5, None).is_none());
        assert!(view.delete(5, Some(&session(2))).is_none());
        let command = view.delete(5, Some(&session(1))).unwrap();
        assert_eq!(command.user_id, 1);
        assert_eq!(command.token, "tok");
    }

    #[test]
    fn failed_delete_keeps_the_item() {
        let mut view = UserMoviesView::default();
        let request = view.open(1, None);
        view.apply_loaded(loaded(request.generation, 1, vec![movie(5, None)]));
        view.apply_delete(DeleteOutcome {
            user_id: 1,
            movie_id: 5,
            result: Err(ApiError::Rejected { status: 500, message: None }),
        });
        assert_eq!(view.list().len(), 1);
        assert_eq!(view.error(), Some(DELETE_FAILED_MESSAGE));
    }

    #[test]
    fn review_toggle_requires_review_text() {
        let mut view = UserMoviesView::default();
        let request = view.open(1, None);
        view.apply_loaded(loaded(
            request.generation,
            1,
            vec![movie(1, Some("great")), movie(2, Some("   ")), movie(3, None)],
        ));
        view.toggle_review(1);
        view.toggle_review(2);
        view.toggle_review(3);
        assert!(view.review_expanded(1));
        assert!(!view.review_expanded(2));
        assert!(!view.review_expanded(3));
        view.toggle_review(1);
        assert!(!view.review_expanded(1));
    }
}

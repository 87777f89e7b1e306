//! People search, the viewer's followees, and a selected user's list.

use std::time::Duration;

use tokio::time::Instant;

use crate::api::ApiClient;
use crate::follow::{FollowCommand, FollowGraphSync, FollowOutcome};
use crate::query::{QueryPipeline, QueryPoll, QueryResponse, QueryTicket};
use crate::types::{Session, User};
use crate::view::user_movies::{UserMoviesRequest, UserMoviesView};

/// User searches shorter than this never reach the server.
pub const MIN_USER_QUERY_LEN: usize = 2;

/// A user search, carrying the viewer's token when signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSearch {
    pub ticket: QueryTicket,
    pub token: Option<String>,
}

impl UserSearch {
    pub async fn execute(self, api: &dyn ApiClient) -> QueryResponse<User> {
        let result = api.search_users(&self.ticket.query, self.token.as_deref()).await;
        self.ticket.respond(result)
    }
}

pub struct FriendsView {
    pipeline: QueryPipeline,
    results: Vec<User>,
    follow: FollowGraphSync,
    selected: Option<User>,
    movies: UserMoviesView,
}

impl FriendsView {
    pub fn new(debounce: Duration, page_size: usize) -> Self {
        Self {
            pipeline: QueryPipeline::new(debounce, MIN_USER_QUERY_LEN),
            results: Vec::new(),
            follow: FollowGraphSync::new(),
            selected: None,
            movies: UserMoviesView::new(page_size),
        }
    }

    pub fn input(&mut self, raw: impl Into<String>, now: Instant) {
        self.pipeline.input(raw, now);
    }

    pub fn poll(&mut self, now: Instant, session: Option<&Session>) -> Option<UserSearch> {
        match self.pipeline.poll(now) {
            QueryPoll::Issue(ticket) => Some(UserSearch {
                ticket,
                token: session.map(|s| s.token.clone()),
            }),
            QueryPoll::Cleared => {
                self.results.clear();
                None
            }
            QueryPoll::Waiting | QueryPoll::Retained => None,
        }
    }

    pub fn apply_search(&mut self, response: QueryResponse<User>) -> bool {
        match self.pipeline.apply(response) {
            Some(users) => {
                self.results = users;
                true
            }
            None => false,
        }
    }

    /// Forwards a session change to the followee set. A sign-out also drops
    /// the selection.
    pub fn on_session(&mut self, session: Option<&Session>) -> Option<FollowCommand> {
        if session.is_none() {
            self.selected = None;
            self.movies.close();
        }
        self.follow.on_session(session)
    }

    /// Selects `user` and starts loading their list with fresh sort, page and
    /// review state.
    pub fn select_user(&mut self, user: User, session: Option<&Session>) -> UserMoviesRequest {
        let request = self.movies.open(user.id, session);
        self.selected = Some(user);
        request
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.movies.close();
    }

    pub fn toggle_follow_selected(&mut self) -> Option<FollowCommand> {
        let target = self.selected.clone()?;
        self.follow.toggle(&target)
    }

    pub fn apply_follow(&mut self, outcome: FollowOutcome) {
        self.follow.apply(outcome);
    }

    pub fn selected(&self) -> Option<&User> {
        self.selected.as_ref()
    }

    pub fn selected_is_viewer(&self) -> bool {
        match (&self.selected, self.follow.viewer_id()) {
            (Some(user), Some(viewer)) => user.id == viewer,
            _ => false,
        }
    }

    pub fn selected_is_followed(&self) -> bool {
        self.selected.as_ref().is_some_and(|u| self.follow.is_following(u.id))
    }

    /// True when a follow button for the selection should be enabled.
    pub fn can_follow_selected(&self) -> bool {
        self.selected.is_some()
            && self.follow.viewer_id().is_some()
            && !self.selected_is_viewer()
            && !self.follow.mutation_pending()
    }

    pub fn pipeline(&self) -> &QueryPipeline {
        &self.pipeline
    }

    pub fn results(&self) -> &[User] {
        &self.results
    }

    pub fn follow(&self) -> &FollowGraphSync {
        &self.follow
    }

    pub fn movies(&self) -> &UserMoviesView {
        &self.movies
    }

    pub fn movies_mut(&mut self) -> &mut UserMoviesView {
        &mut self.movies
    }
}

impl Default for FriendsView {
    fn default() -> Self {
        Self::new(crate::query::DEFAULT_DEBOUNCE, crate::view::DEFAULT_PAGE_SIZE)
    }
}

//! Runs API requests off the UI task.
//!
//! The UI builds [`ApiJob`] values (the request halves handed out by the core
//! views) and the main loop passes each one to [`spawn_job`]. Every job runs on
//! its own tokio task and its [`ApiOutcome`] comes back as `AppEvent::Api`, so
//! requests never block input handling and may finish in any order.

use std::sync::Arc;

use cinelog_core::api::ApiClient;
use cinelog_core::error::ApiError;
use cinelog_core::follow::{FollowCommand, FollowOutcome};
use cinelog_core::nav::MovieLookup;
use cinelog_core::query::{QueryResponse, QueryTicket};
use cinelog_core::types::{LoginPayload, Movie, RegisterPayload, Session, User};
use cinelog_core::view::rating::{RatingCommand, RatingOutcome};
use cinelog_core::view::trending::{TrendingCommand, TrendingOutcome};
use cinelog_core::view::user_movies::{
    DeleteCommand, DeleteOutcome, UserMoviesLoaded, UserMoviesRequest,
};
use cinelog_core::view::{friends::UserSearch, SearchView};
use tokio::sync::mpsc::UnboundedSender;

use crate::event::AppEvent;

/// Which on-screen list a user-movies request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSlot {
    /// The full-screen list reached through `Route::UserMovies`.
    Screen,
    /// The selected user's list on the friends screen.
    Friends,
}

#[derive(Debug, Clone)]
pub enum ApiJob {
    Login(LoginPayload),
    Register(RegisterPayload),
    SearchMovies(QueryTicket),
    SearchUsers(UserSearch),
    Follow(FollowCommand),
    LoadList(ListSlot, UserMoviesRequest),
    Delete(ListSlot, DeleteCommand),
    Rate(RatingCommand),
    Trending(TrendingCommand),
    MovieInfo(MovieLookup),
}

#[derive(Debug)]
pub enum ApiOutcome {
    Auth(Result<Session, ApiError>),
    MovieSearch(QueryResponse<Movie>),
    UserSearch(QueryResponse<User>),
    Follow(FollowOutcome),
    ListLoaded(ListSlot, UserMoviesLoaded),
    Deleted(ListSlot, DeleteOutcome),
    Rated(RatingOutcome),
    Trending(TrendingOutcome),
    MovieInfo(Movie),
}

impl ApiJob {
    /// Short label for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            ApiJob::Login(_) => "login",
            ApiJob::Register(_) => "register",
            ApiJob::SearchMovies(_) => "search_movies",
            ApiJob::SearchUsers(_) => "search_users",
            ApiJob::Follow(_) => "follow",
            ApiJob::LoadList(..) => "load_list",
            ApiJob::Delete(..) => "delete",
            ApiJob::Rate(_) => "rate",
            ApiJob::Trending(_) => "trending",
            ApiJob::MovieInfo(_) => "movie_info",
        }
    }

    /// Runs the request and maps the response into an outcome.
    pub async fn run(self, api: &dyn ApiClient) -> ApiOutcome {
        match self {
            ApiJob::Login(payload) => ApiOutcome::Auth(api.login(&payload).await),
            ApiJob::Register(payload) => ApiOutcome::Auth(api.register(&payload).await),
            ApiJob::SearchMovies(ticket) => {
                ApiOutcome::MovieSearch(SearchView::execute(ticket, api).await)
            }
            ApiJob::SearchUsers(search) => ApiOutcome::UserSearch(search.execute(api).await),
            ApiJob::Follow(command) => ApiOutcome::Follow(command.execute(api).await),
            ApiJob::LoadList(slot, request) => {
                ApiOutcome::ListLoaded(slot, request.execute(api).await)
            }
            ApiJob::Delete(slot, command) => ApiOutcome::Deleted(slot, command.execute(api).await),
            ApiJob::Rate(command) => ApiOutcome::Rated(command.execute(api).await),
            ApiJob::Trending(command) => ApiOutcome::Trending(command.execute(api).await),
            ApiJob::MovieInfo(lookup) => ApiOutcome::MovieInfo(lookup.execute(api).await),
        }
    }
}

/// Spawns `job` on the runtime and sends its outcome to `event_tx`.
pub fn spawn_job(api: Arc<dyn ApiClient>, job: ApiJob, event_tx: UnboundedSender<AppEvent>) {
    tracing::debug!(job = job.name(), "dispatching request");
    tokio::spawn(async move {
        let outcome = job.run(api.as_ref()).await;
        let _ = event_tx.send(AppEvent::Api(Box::new(outcome)));
    });
}

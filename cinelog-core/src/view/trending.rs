//! Latest ratings and top-rated feeds.

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::types::{RecentRating, TopRated};

/// A list that loads once and remembers how that went.
#[derive(Debug, Clone)]
pub struct Loadable<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self { items: Vec::new(), loading: false, error: None }
    }
}

impl<T> Loadable<T> {
    fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish(&mut self, result: Result<Vec<T>, ApiError>) {
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                self.items.clear();
                self.error = Some(e.user_message());
            }
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingCommand {
    Latest,
    Top,
}

#[derive(Debug, Clone)]
pub enum TrendingOutcome {
    Latest(Result<Vec<RecentRating>, ApiError>),
    Top(Result<Vec<TopRated>, ApiError>),
}

impl TrendingCommand {
    pub async fn execute(self, api: &dyn ApiClient) -> TrendingOutcome {
        match self {
            TrendingCommand::Latest => TrendingOutcome::Latest(api.trending_latest().await),
            TrendingCommand::Top => TrendingOutcome::Top(api.trending_top().await),
        }
    }
}

#[derive(Debug, Default)]
pub struct TrendingView {
    latest: Loadable<RecentRating>,
    top: Loadable<TopRated>,
}

impl TrendingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts both feeds. They load and fail independently.
    pub fn refresh(&mut self) -> [TrendingCommand; 2] {
        self.latest.start();
        self.top.start();
        [TrendingCommand::Latest, TrendingCommand::Top]
    }

    pub fn apply(&mut self, outcome: TrendingOutcome) {
        match outcome {
            TrendingOutcome::Latest(result) => {
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "latest ratings failed");
                }
                self.latest.finish(result);
            }
            TrendingOutcome::Top(result) => {
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "top rated failed");
                }
                self.top.finish(result);
            }
        }
    }

    pub fn latest(&self) -> &Loadable<RecentRating> {
        &self.latest
    }

    pub fn top(&self) -> &Loadable<TopRated> {
        &self.top
    }
}

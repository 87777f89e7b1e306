//! Movie search-as-you-type.

use std::time::Duration;

use tokio::time::Instant;

use crate::api::ApiClient;
use crate::query::{QueryPipeline, QueryPoll, QueryResponse, QueryTicket};
use crate::types::Movie;
use crate::view::ListView;

pub struct SearchView {
    pipeline: QueryPipeline,
    results: ListView<Movie>,
}

impl SearchView {
    pub fn new(debounce: Duration, page_size: usize) -> Self {
        Self {
            pipeline: QueryPipeline::new(debounce, 1),
            results: ListView::new(page_size),
        }
    }

    pub fn input(&mut self, raw: impl Into<String>, now: Instant) {
        self.pipeline.input(raw, now);
    }

    /// Closes the debounce window. Returns the search to run, if any.
    ///
    /// Empty text clears the results right here.
    pub fn poll(&mut self, now: Instant) -> Option<QueryTicket> {
        match self.pipeline.poll(now) {
            QueryPoll::Issue(ticket) => Some(ticket),
            QueryPoll::Cleared => {
                self.results.clear();
                None
            }
            QueryPoll::Waiting | QueryPoll::Retained => None,
        }
    }

    pub async fn execute(ticket: QueryTicket, api: &dyn ApiClient) -> QueryResponse<Movie> {
        let result = api.search_movies(&ticket.query).await;
        ticket.respond(result)
    }

    /// Publishes a response. Returns false when it was stale and dropped.
    pub fn apply(&mut self, response: QueryResponse<Movie>) -> bool {
        match self.pipeline.apply(response) {
            Some(movies) => {
                self.results.replace(movies);
                true
            }
            None => false,
        }
    }

    pub fn pipeline(&self) -> &QueryPipeline {
        &self.pipeline
    }

    pub fn results(&self) -> &ListView<Movie> {
        &self.results
    }

    pub fn results_mut(&mut self) -> &mut ListView<Movie> {
        &mut self.results
    }

    /// True when a search ran and found nothing.
    pub fn show_no_results(&self) -> bool {
        self.pipeline.searched()
            && !self.pipeline.is_loading()
            && self.pipeline.error().is_none()
            && !self.pipeline.query().is_empty()
            && self.results.is_empty()
    }
}

impl Default for SearchView {
    fn default() -> Self {
        Self::new(crate::query::DEFAULT_DEBOUNCE, crate::view::DEFAULT_PAGE_SIZE)
    }
}

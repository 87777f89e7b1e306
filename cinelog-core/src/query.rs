//! Debounced, latest-wins query pipeline.
//!
//! One [`QueryPipeline`] turns a stream of raw text edits into at most one
//! request per settled intent:
//!
//! ```text
//! Idle ──input──▶ Debouncing ──window elapses──▶ InFlight ──▶ Settled | Failed
//!   ▲                 │  ▲ input restarts window     │ input supersedes
//!   └──same as last───┘  └───────────────────────────┘
//! ```
//!
//! The pipeline never touches a clock or the network itself. The owner feeds
//! it edits with [`QueryPipeline::input`], calls [`QueryPipeline::poll`] once
//! [`QueryPipeline::deadline`] has passed, runs the returned [`QueryTicket`]
//! however it likes, and hands the response back to [`QueryPipeline::apply`].
//! Every issued ticket carries a generation number; a response is accepted only
//! if its generation is the one currently in flight, so stale responses are
//! dropped no matter when they arrive.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::ApiError;

/// Debounce window used by the search screens.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    #[default]
    Idle,
    Debouncing,
    InFlight,
    Settled,
    Failed,
}

/// A request the owner must run: search for `query`, then hand the result
/// back tagged with `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub generation: u64,
    pub query: String,
}

impl QueryTicket {
    pub fn respond<T>(&self, result: Result<Vec<T>, ApiError>) -> QueryResponse<T> {
        QueryResponse { generation: self.generation, result }
    }
}

/// The outcome of running a [`QueryTicket`].
#[derive(Debug, Clone)]
pub struct QueryResponse<T> {
    pub generation: u64,
    pub result: Result<Vec<T>, ApiError>,
}

/// What [`QueryPipeline::poll`] decided once the debounce window closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPoll {
    /// Still debouncing, or nothing pending.
    Waiting,
    /// Same text as the last settled query; keep the current results.
    Retained,
    /// Empty or too-short text; publish an empty result set.
    Cleared,
    /// Run this request.
    Issue(QueryTicket),
}

#[derive(Debug, Clone)]
pub struct QueryPipeline {
    debounce: Duration,
    min_len: usize,
    phase: QueryPhase,
    raw: String,
    deadline: Option<Instant>,
    next_generation: u64,
    in_flight: Option<QueryTicket>,
    settled: Option<String>,
    committed: String,
    searched: bool,
    error: Option<String>,
}

impl QueryPipeline {
    /// `min_len` is the number of characters (after trimming) below which the
    /// text is treated as "no query". Values below 1 are raised to 1.
    pub fn new(debounce: Duration, min_len: usize) -> Self {
        Self {
            debounce,
            min_len: min_len.max(1),
            phase: QueryPhase::Idle,
            raw: String::new(),
            deadline: None,
            next_generation: 0,
            in_flight: None,
            settled: None,
            committed: String::new(),
            searched: false,
            error: None,
        }
    }

    /// Records a text edit at `now` and (re)starts the debounce window.
    ///
    /// An outstanding request is superseded: its response will be discarded.
    pub fn input(&mut self, raw: impl Into<String>, now: Instant) {
        self.raw = raw.into();
        if let Some(ticket) = self.in_flight.take() {
            tracing::debug!(generation = ticket.generation, query = %ticket.query, "superseded in-flight query");
        }
        self.deadline = Some(now + self.debounce);
        self.phase = QueryPhase::Debouncing;
    }

    /// Closes the debounce window if it has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> QueryPoll {
        match self.deadline {
            Some(deadline) if self.phase == QueryPhase::Debouncing && now >= deadline => {}
            _ => return QueryPoll::Waiting,
        }
        self.deadline = None;

        let query = self.raw.trim().to_owned();
        self.committed = query.clone();

        if self.settled.as_deref() == Some(query.as_str()) {
            self.phase = QueryPhase::Idle;
            tracing::debug!(query = %query, "query unchanged; keeping results");
            return QueryPoll::Retained;
        }

        if query.chars().count() < self.min_len {
            if !query.is_empty() {
                self.searched = true;
            }
            self.error = None;
            self.settled = Some(query);
            self.phase = QueryPhase::Settled;
            return QueryPoll::Cleared;
        }

        self.next_generation += 1;
        let ticket = QueryTicket { generation: self.next_generation, query };
        tracing::debug!(generation = ticket.generation, query = %ticket.query, "issuing query");
        self.in_flight = Some(ticket.clone());
        self.searched = true;
        self.error = None;
        self.phase = QueryPhase::InFlight;
        QueryPoll::Issue(ticket)
    }

    /// Applies a response. Returns the result set to publish, or `None` when
    /// the response belongs to a superseded request and was dropped.
    ///
    /// A failure publishes an empty set and records a user-facing error.
    pub fn apply<T>(&mut self, response: QueryResponse<T>) -> Option<Vec<T>> {
        let ticket = match &self.in_flight {
            Some(ticket) if ticket.generation == response.generation => self.in_flight.take()?,
            _ => {
                tracing::debug!(generation = response.generation, "dropping stale query response");
                return None;
            }
        };

        match response.result {
            Ok(items) => {
                self.settled = Some(ticket.query);
                self.error = None;
                self.phase = QueryPhase::Settled;
                Some(items)
            }
            Err(e) => {
                tracing::warn!(query = %ticket.query, error = %e, "query failed");
                self.settled = None;
                self.error = Some(e.user_message());
                self.phase = QueryPhase::Failed;
                Some(Vec::new())
            }
        }
    }

    pub fn phase(&self) -> QueryPhase {
        self.phase
    }

    /// When the current debounce window closes, if one is open.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_loading(&self) -> bool {
        self.phase == QueryPhase::InFlight
    }

    /// True once any non-empty query has been committed. Never reverts.
    pub fn searched(&self) -> bool {
        self.searched
    }

    /// The raw text as last typed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The trimmed text of the last query that left the debounce window.
    pub fn query(&self) -> &str {
        &self.committed
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Default for QueryPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn issue(poll: QueryPoll) -> QueryTicket {
        match poll {
            QueryPoll::Issue(ticket) => ticket,
            other => panic!("expected a ticket, got {other:?}"),
        }
    }

    #[test]
    fn burst_of_edits_issues_one_request_for_the_final_text() {
        let t0 = Instant::now();
        let mut pipeline = QueryPipeline::default();
        pipeline.input("b", t0);
        pipeline.input("ba", t0 + ms(40));
        pipeline.input("bat", t0 + ms(80));
        pipeline.input("batman", t0 + ms(180));

        assert_eq!(pipeline.poll(t0 + ms(300)), QueryPoll::Waiting);
        assert_eq!(pipeline.phase(), QueryPhase::Debouncing);

        let ticket = issue(pipeline.poll(t0 + ms(480)));
        assert_eq!(ticket.query, "batman");
        assert!(pipeline.is_loading());
        assert_eq!(pipeline.poll(t0 + ms(900)), QueryPoll::Waiting);
    }

    #[test]
    fn typing_bat_then_batman_within_100ms_issues_only_batman() {
        let t0 = Instant::now();
        let mut pipeline = QueryPipeline::default();
        pipeline.input("bat", t0);
        pipeline.input("batman", t0 + ms(100));
        assert_eq!(pipeline.poll(t0 + ms(300)), QueryPoll::Waiting);
        assert_eq!(issue(pipeline.poll(t0 + ms(400))).query, "batman");
    }

    #[test]
    fn empty_text_clears_without_a_request() {
        let t0 = Instant::now();
        let mut pipeline = QueryPipeline::default();
        pipeline.input("   ", t0);
        assert_eq!(pipeline.poll(t0 + ms(300)), QueryPoll::Cleared);
        assert!(!pipeline.is_loading());
        assert!(!pipeline.searched());
    }

    #[test]
    fn text_is_trimmed_before_issuing_and_deduping() {
        let t0 = Instant::now();
        let mut pipeline = QueryPipeline::default();
        pipeline.input("  alien ", t0);
        let ticket = issue(pipeline.poll(t0 + ms(300)));
        assert_eq!(ticket.query, "alien");
        assert_eq!(pipeline.apply(ticket.respond(Ok(vec![1, 2]))), Some(vec![1, 2]));

        pipeline.input("alien", t0 + ms(1000));
        assert_eq!(pipeline.poll(t0 + ms(1300)), QueryPoll::Retained);
        assert_eq!(pipeline.phase(), QueryPhase::Idle);
    }

    #[test]
    fn older_response_arriving_last_is_dropped() {
        let t0 = Instant::now();
        let mut pipeline = QueryPipeline::default();
        pipeline.input("alien", t0);
        let a = issue(pipeline.poll(t0 + ms(300)));
        pipeline.input("aliens", t0 + ms(400));
        let b = issue(pipeline.poll(t0 + ms(700)));
        assert!(b.generation > a.generation);

        assert_eq!(pipeline.apply(b.respond(Ok(vec!["Aliens (1986)"]))), Some(vec!["Aliens (1986)"]));
        assert_eq!(pipeline.apply(a.respond(Ok(vec!["Alien (1979)"]))), None);
        assert_eq!(pipeline.phase(), QueryPhase::Settled);
    }

    #[test]
    fn input_during_flight_suppresses_its_failure_too() {
        let t0 = Instant::now();
        let mut pipeline = QueryPipeline::default();
        pipeline.input("heat", t0);
        let ticket = issue(pipeline.poll(t0 + ms(300)));
        pipeline.input("heat 1995", t0 + ms(350));

        let dropped: Option<Vec<u8>> =
            pipeline.apply(ticket.respond(Err(ApiError::Transport("reset".into()))));
        assert_eq!(dropped, None);
        assert_eq!(pipeline.error(), None);
        assert_eq!(pipeline.phase(), QueryPhase::Debouncing);
        assert!(!pipeline.is_loading());
    }

    #[test]
    fn failure_publishes_empty_and_allows_retyping_the_same_text() {
        let t0 = Instant::now();
        let mut pipeline = QueryPipeline::default();
        pipeline.input("heat", t0);
        let ticket = issue(pipeline.poll(t0 + ms(300)));
        let published: Option<Vec<u8>> =
            pipeline.apply(ticket.respond(Err(ApiError::Transport("refused".into()))));
        assert_eq!(published, Some(Vec::new()));
        assert_eq!(pipeline.phase(), QueryPhase::Failed);
        assert!(pipeline.error().is_some());

        pipeline.input("heat", t0 + ms(1000));
        assert!(matches!(pipeline.poll(t0 + ms(1300)), QueryPoll::Issue(_)));
        assert_eq!(pipeline.error(), None);
    }

    #[test]
    fn returning_to_the_settled_text_cancels_the_newer_request() {
        let t0 = Instant::now();
        let mut pipeline = QueryPipeline::default();
        pipeline.input("bat", t0);
        let first = issue(pipeline.poll(t0 + ms(300)));
        pipeline.apply(first.respond(Ok(vec![1])));

        pipeline.input("batm", t0 + ms(500));
        let second = issue(pipeline.poll(t0 + ms(800)));
        pipeline.input("bat", t0 + ms(850));
        assert_eq!(pipeline.poll(t0 + ms(1150)), QueryPoll::Retained);
        assert_eq!(pipeline.apply(second.respond(Ok(vec![2]))), None);
        assert!(!pipeline.is_loading());
    }

    #[test]
    fn short_text_marks_searched_without_a_request() {
        let t0 = Instant::now();
        let mut pipeline = QueryPipeline::new(DEFAULT_DEBOUNCE, 2);
        pipeline.input("a", t0);
        assert_eq!(pipeline.poll(t0 + ms(300)), QueryPoll::Cleared);
        assert!(pipeline.searched());
        assert!(!pipeline.is_loading());

        pipeline.input("", t0 + ms(400));
        assert_eq!(pipeline.poll(t0 + ms(700)), QueryPoll::Cleared);
        assert!(pipeline.searched(), "searched flag never reverts");
    }
}

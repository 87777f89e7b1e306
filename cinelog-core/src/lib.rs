//! cinelog-core — client-state synchronization for the cinelog movie client.
//!
//! Everything that turns keystrokes and network responses into consistent view
//! state lives here, free of any terminal code:
//!
//! - [`session`]: the persisted login identity (restore, login, logout).
//! - [`pagination`] and [`sort`]: pure derivations over list collections.
//! - [`query`]: the debounced, latest-wins search pipeline.
//! - [`follow`]: the viewer's followee set, reconciled after follow/unfollow.
//! - [`view`]: per-screen composites wiring the pieces above together.
//! - [`api`] / [`http`]: the remote service seam and its reqwest implementation.
//! - [`kv`], [`db`], [`schema`]: durable key-value storage for the session record.
//!
//! Components are sans-IO: they hand out request values (tickets, commands) and
//! accept the matching outcomes. Each request type has an async `execute` that
//! runs it against an [`api::ApiClient`], so callers choose where the await happens.

pub mod api;
pub mod db;
pub mod error;
pub mod follow;
pub mod http;
pub mod kv;
pub mod nav;
pub mod pagination;
pub mod query;
pub mod schema;
pub mod session;
pub mod sort;
pub mod types;
pub mod view;

pub use error::{ApiError, StoreError};
pub use types::{Movie, Session, User, UserMovie};

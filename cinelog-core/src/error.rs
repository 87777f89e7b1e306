//! Error types shared across the core.

use thiserror::Error;

/// Shown when the server cannot be reached at all.
pub const UNREACHABLE_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";
/// Shown when the server rejects a request without saying why.
pub const REJECTED_MESSAGE: &str = "The server rejected the request.";
/// Shown for anything we cannot classify.
pub const UNKNOWN_MESSAGE: &str = "Something went wrong. Please try again.";

/// Failure of a call to the remote service, or of the input checks in front of it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Input was rejected before any request was made.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The server could not be reached (connect failure, timeout, broken body).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },

    /// The server answered successfully but the body did not decode.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The string shown to the user for this error. Never a raw protocol error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Transport(_) => UNREACHABLE_MESSAGE.to_owned(),
            Self::Rejected { message: Some(m), .. } if !m.trim().is_empty() => m.clone(),
            Self::Rejected { .. } => REJECTED_MESSAGE.to_owned(),
            Self::Decode(_) => UNKNOWN_MESSAGE.to_owned(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Failure of the durable key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

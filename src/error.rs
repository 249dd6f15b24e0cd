//! The error taxonomy every fallible operation of this crate reports

use thiserror::Error;

use crate::task::TaskId;

/// Everything that can go wrong between a user action and the server's answer.
///
/// None of these are fatal to the caller: the planner stays interactive and the
/// failed action can be retried manually.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected before any network call was made (e.g. an empty task title)
    #[error("invalid input: {0}")]
    Validation(String),

    /// The credential is missing, expired or invalid. Re-authenticating is the only fix.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The task no longer exists server-side
    #[error("no such task: {0}")]
    NotFound(TaskId),

    /// Transport-level failure (connection refused, timeout, unreadable reply)
    #[error("network failure: {0}")]
    Network(String),

    /// The server answered with a non-success status that maps to none of the variants above.
    /// `message` carries whatever details the server put in its reply body.
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// The session backing file could not be read or written
    #[error("session storage: {0}")]
    Storage(String),

    /// The configured base URL does not parse
    #[error("invalid URL: {0}")]
    BadUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

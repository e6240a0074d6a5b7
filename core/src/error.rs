//! The single failure kind of the counter client.
//!
//! # Design
//! Every unsuccessful round trip ends up as a `RequestFailure`. Callers never
//! branch on the variant: the failure is rendered into the status message
//! shown to the user. The variants exist so that message carries a useful
//! detail.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestFailure {
    /// The request never produced a response (connection refused, DNS, I/O).
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not a valid `CounterResponse`.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl RequestFailure {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        RequestFailure::Transport(err.to_string())
    }
}

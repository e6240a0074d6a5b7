//! Wire and display types for the counter API.

use serde::{Deserialize, Serialize};

/// Body returned by both counter endpoints. Extra fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CounterResponse {
    pub count: i64,
    pub message: String,
}

/// What the page shows: the last known count, the last status line, and
/// whether an increment is outstanding.
///
/// `count` is `None` until the first successful response arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterState {
    pub count: Option<i64>,
    pub message: String,
    pub loading: bool,
}

/// The two remote operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Refresh,
    Increment,
}

impl Operation {
    /// Prefix of the status message shown when this operation fails.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            Operation::Refresh => "Error fetching counter",
            Operation::Increment => "Error incrementing counter",
        }
    }
}

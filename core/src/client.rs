//! Stateless HTTP request builder and response parser for the counter API.
//!
//! # Design
//! `CounterClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and `parse_counter`, which
//! consumes the `HttpResponse`. The caller executes the round-trip, keeping
//! the core deterministic and free of I/O dependencies.

use crate::error::RequestFailure;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CounterResponse, Operation};

pub const COUNTER_PATH: &str = "/api/counter";
pub const INCREMENT_PATH: &str = "/api/counter/increment";

/// Synchronous, stateless client for the counter API.
#[derive(Debug, Clone)]
pub struct CounterClient {
    base_url: String,
}

impl CounterClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_counter(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{COUNTER_PATH}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// The increment call carries no body at all, not even `{}`.
    pub fn build_increment(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{INCREMENT_PATH}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_request(&self, operation: Operation) -> HttpRequest {
        match operation {
            Operation::Refresh => self.build_get_counter(),
            Operation::Increment => self.build_increment(),
        }
    }

    /// Both endpoints answer with the same body, so one parser serves both.
    pub fn parse_counter(&self, response: HttpResponse) -> Result<CounterResponse, RequestFailure> {
        if !response.is_success() {
            return Err(RequestFailure::Status {
                status: response.status,
                body: response.body,
            });
        }
        serde_json::from_str(&response.body).map_err(|e| RequestFailure::Decode(e.to_string()))
    }
}

//! Synchronous API client core for the counter service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and tracks the state a page
//! displays: the count, a status message, and whether an increment is in
//! flight.
//!
//! # Design
//! - `CounterClient` is stateless; it holds only `base_url`.
//! - `CounterSession` owns the displayed `CounterState` and decides which
//!   outcomes are applied when calls overlap.
//! - Every failure collapses into `RequestFailure` and from there into the
//!   status message; nothing is propagated to the page.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod session;
pub mod types;

pub use client::CounterClient;
pub use error::RequestFailure;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{Completion, CounterSession, Ticket};
pub use types::{CounterResponse, CounterState, Operation};

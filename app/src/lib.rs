//! Async front-end for the counter service.
//!
//! # Overview
//! Wires `counter-core` to the network: `Config` picks the base URL,
//! `UreqTransport` performs the round-trips, `CounterPage` runs the
//! refresh/increment operations and publishes state, and `render` turns that
//! state into text.

pub mod config;
pub mod page;
pub mod render;
pub mod transport;

pub use config::Config;
pub use page::CounterPage;
pub use render::render;
pub use transport::{Transport, UreqTransport};

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const CURRENT_MESSAGE: &str = "Current count";
pub const INCREMENTED_MESSAGE: &str = "Counter incremented";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CounterResponse {
    pub count: i64,
    pub message: String,
}

pub type Counter = Arc<RwLock<i64>>;

pub fn app() -> Router {
    app_with(Arc::new(RwLock::new(0)))
}

/// Router over an existing counter, so tests can seed or inspect it.
pub fn app_with(counter: Counter) -> Router {
    Router::new()
        .route("/api/counter", get(get_counter))
        .route("/api/counter/increment", post(increment_counter))
        .with_state(counter)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn get_counter(State(counter): State<Counter>) -> Json<CounterResponse> {
    let count = *counter.read().await;
    debug!(count, "counter read");
    Json(CounterResponse {
        count,
        message: CURRENT_MESSAGE.to_string(),
    })
}

/// Fails with 409 and leaves the counter alone once it reaches `i64::MAX`.
async fn increment_counter(
    State(counter): State<Counter>,
) -> Result<Json<CounterResponse>, StatusCode> {
    let mut guard = counter.write().await;
    let count = guard.checked_add(1).ok_or(StatusCode::CONFLICT)?;
    *guard = count;
    debug!(count, "counter incremented");
    Ok(Json(CounterResponse {
        count,
        message: INCREMENTED_MESSAGE.to_string(),
    }))
}

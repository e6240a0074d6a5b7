//! Executes core `HttpRequest`s against the network.
//!
//! # Design
//! `Transport` is the seam between the I/O-free core and the outside world.
//! The page driver is generic over it so tests can script responses and hold
//! requests open. `UreqTransport` is the production implementation: ureq is
//! blocking, so each round-trip runs on tokio's blocking pool and the page
//! task awaits it without stalling the runtime.

use std::future::Future;

use counter_core::{HttpMethod, HttpRequest, HttpResponse, RequestFailure};
use tracing::debug;

pub trait Transport: Send + Sync + 'static {
    /// Perform one round-trip. Non-2xx statuses are returned as responses,
    /// not failures; only a missing response is a failure here.
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, RequestFailure>> + Send;
}

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    /// Status codes come back as data so the core can interpret them.
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, RequestFailure>> + Send {
        let agent = self.agent.clone();
        async move {
            match tokio::task::spawn_blocking(move || send(&agent, request)).await {
                Ok(result) => result,
                Err(join) => Err(RequestFailure::transport(join)),
            }
        }
    }
}

fn send(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, RequestFailure> {
    debug!(method = request.method.as_str(), url = %request.path, "sending request");

    let result = match request.method {
        HttpMethod::Get => with_headers(agent.get(&request.path), &request.headers).call(),
        HttpMethod::Post => {
            let builder = with_headers(agent.post(&request.path), &request.headers);
            match &request.body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    };
    let mut response = result.map_err(RequestFailure::transport)?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                v.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(RequestFailure::transport)?;

    debug!(status, "received response");
    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

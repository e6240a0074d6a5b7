//! `CounterPage` over `UreqTransport` against the mock server on a random port.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderMap;
use axum::routing::get;
use axum::Router;
use counter_app::{render, Config, CounterPage, Transport, UreqTransport};
use counter_core::{HttpMethod, HttpRequest};

async fn spawn_mock_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    addr
}

/// Answers with the `x-trace` header and the request body, joined by `|`.
async fn spawn_echo_server() -> SocketAddr {
    async fn echo(headers: HeaderMap, body: String) -> String {
        let trace = headers
            .get("x-trace")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        format!("{trace}|{body}")
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/echo", get(echo).post(echo));
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    addr
}

fn page_for(base_url: String) -> Arc<CounterPage<UreqTransport>> {
    Arc::new(CounterPage::new(&Config { base_url }, UreqTransport::new()))
}

#[tokio::test(flavor = "multi_thread")]
async fn activate_then_increment() {
    let addr = spawn_mock_server().await;
    let page = page_for(format!("http://{addr}/"));

    assert!(page.activate().await);
    let state = page.state();
    assert_eq!(state.count, Some(0));
    assert_eq!(state.message, "Current count");

    page.press_increment().unwrap().await.unwrap();
    page.increment().await;

    let state = page.state();
    assert_eq!(state.count, Some(2));
    assert_eq!(state.message, "Counter incremented");
    assert!(!state.loading);
    assert_eq!(
        render(&state),
        "Counter Demo\n2\n[ Increment Counter ]\nCounter incremented"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_shows_error() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let page = page_for(format!("http://{addr}"));

    page.activate().await;
    page.increment().await;

    let state = page.state();
    assert!(state.count.is_none());
    assert!(!state.loading);
    assert!(
        state.message.starts_with("Error incrementing counter: "),
        "got {:?}",
        state.message
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn transport_forwards_headers_and_body() {
    let addr = spawn_echo_server().await;
    let transport = UreqTransport::new();
    let headers = vec![("x-trace".to_string(), "abc".to_string())];

    let response = transport
        .execute(HttpRequest {
            method: HttpMethod::Post,
            path: format!("http://{addr}/echo"),
            headers: headers.clone(),
            body: Some(r#"{"step":1}"#.to_string()),
        })
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, r#"abc|{"step":1}"#);

    let response = transport
        .execute(HttpRequest {
            method: HttpMethod::Get,
            path: format!("http://{addr}/echo"),
            headers,
            body: None,
        })
        .await
        .unwrap();
    assert_eq!(response.body, "abc|");
}

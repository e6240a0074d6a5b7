//! `CounterPage` behavior over a scripted transport.
//!
//! Replies are queued up front; a reply can be gated so the test decides
//! when the "network" answers.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

use counter_app::{Config, CounterPage, Transport};
use counter_core::{Completion, HttpMethod, HttpRequest, HttpResponse, RequestFailure};
use tokio::sync::oneshot;

struct Reply {
    gate: Option<oneshot::Receiver<()>>,
    outcome: Result<HttpResponse, RequestFailure>,
}

#[derive(Default)]
struct ScriptedTransport {
    requests: Mutex<Vec<HttpRequest>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl ScriptedTransport {
    fn reply(&self, outcome: Result<HttpResponse, RequestFailure>) {
        self.replies.lock().unwrap().push_back(Reply { gate: None, outcome });
    }

    /// Queue a reply that is held back until the returned sender fires.
    fn gated_reply(&self, outcome: Result<HttpResponse, RequestFailure>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply {
            gate: Some(rx),
            outcome,
        });
        tx
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, RequestFailure>> + Send {
        self.requests.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().pop_front();
        async move {
            let Some(reply) = reply else {
                return Err(RequestFailure::Transport("no scripted reply".into()));
            };
            if let Some(gate) = reply.gate {
                let _ = gate.await;
            }
            reply.outcome
        }
    }
}

fn counter(count: i64, message: &str) -> Result<HttpResponse, RequestFailure> {
    Ok(HttpResponse {
        status: 200,
        headers: Vec::new(),
        body: format!(r#"{{"count":{count},"message":"{message}"}}"#),
    })
}

fn page() -> Arc<CounterPage<ScriptedTransport>> {
    let config = Config {
        base_url: "http://counter.test".to_string(),
    };
    Arc::new(CounterPage::new(&config, ScriptedTransport::default()))
}

async fn wait_for_requests(page: &CounterPage<ScriptedTransport>, n: usize) {
    while page.transport().requests().len() < n {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn activation_fetches_exactly_once() {
    let page = page();
    page.transport().reply(counter(5, "ok"));

    assert!(page.activate().await);
    assert!(!page.activate().await);

    let requests = page.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(requests[0].path, "http://counter.test/api/counter");

    let state = page.state();
    assert_eq!(state.count, Some(5));
    assert_eq!(state.message, "ok");
    assert!(!state.loading);
}

#[tokio::test]
async fn failed_refresh_leaves_count_unset() {
    let page = page();
    page.transport()
        .reply(Err(RequestFailure::Transport("connection refused".into())));

    page.refresh().await;

    let state = page.state();
    assert!(state.count.is_none());
    assert_eq!(state.message, "Error fetching counter: connection refused");
}

#[tokio::test]
async fn increment_sets_loading_until_response() {
    let page = page();
    let release = page.transport().gated_reply(counter(6, "incremented"));

    let handle = page.press_increment().expect("trigger enabled");
    assert!(page.state().loading, "loading before the response arrives");

    wait_for_requests(&page, 1).await;
    let requests = page.transport().requests();
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].path, "http://counter.test/api/counter/increment");
    assert!(requests[0].body.is_none());

    release.send(()).unwrap();
    assert_eq!(handle.await.unwrap(), Completion::Applied);

    let state = page.state();
    assert!(!state.loading);
    assert_eq!(state.count, Some(6));
    assert_eq!(state.message, "incremented");
}

#[tokio::test]
async fn trigger_is_disabled_while_loading() {
    let page = page();
    let release = page.transport().gated_reply(counter(1, "incremented"));

    let handle = page.press_increment().expect("trigger enabled");
    assert!(page.press_increment().is_none());

    release.send(()).unwrap();
    handle.await.unwrap();
    assert_eq!(page.transport().requests().len(), 1);

    page.transport().reply(counter(2, "incremented"));
    let handle = page.press_increment().expect("enabled again");
    handle.await.unwrap();
    assert_eq!(page.state().count, Some(2));
}

#[tokio::test]
async fn failed_increment_keeps_previous_count() {
    let page = page();
    page.transport().reply(counter(3, "ok"));
    page.transport().reply(Ok(HttpResponse {
        status: 500,
        headers: Vec::new(),
        body: "Internal Server Error".to_string(),
    }));

    page.refresh().await;
    page.increment().await;

    let state = page.state();
    assert_eq!(state.count, Some(3));
    assert!(!state.loading);
    assert_eq!(
        state.message,
        "Error incrementing counter: HTTP 500: Internal Server Error"
    );
}

#[tokio::test]
async fn increment_replaces_count_regardless_of_prior_value() {
    let page = page();
    page.transport().reply(counter(100, "ok"));
    page.transport().reply(counter(6, "incremented"));

    page.refresh().await;
    page.increment().await;

    assert_eq!(page.state().count, Some(6));
}

#[tokio::test]
async fn overlapping_increments_keep_newest_response() {
    let page = page();
    let release_first = page.transport().gated_reply(counter(1, "first"));
    let release_second = page.transport().gated_reply(counter(2, "second"));

    let first = tokio::spawn({
        let page = Arc::clone(&page);
        async move { page.increment().await }
    });
    wait_for_requests(&page, 1).await;
    let second = tokio::spawn({
        let page = Arc::clone(&page);
        async move { page.increment().await }
    });
    wait_for_requests(&page, 2).await;

    release_second.send(()).unwrap();
    assert_eq!(second.await.unwrap(), Completion::Applied);
    assert!(page.state().loading, "first increment still outstanding");

    release_first.send(()).unwrap();
    assert_eq!(first.await.unwrap(), Completion::Stale);

    let state = page.state();
    assert_eq!(state.count, Some(2));
    assert_eq!(state.message, "second");
    assert!(!state.loading);
}

#[tokio::test]
async fn refresh_during_increment_does_not_hide_its_result() {
    let page = page();
    let release = page.transport().gated_reply(counter(6, "incremented"));
    page.transport().reply(counter(5, "Current count"));

    let handle = page.press_increment().expect("trigger enabled");
    wait_for_requests(&page, 1).await;

    // The GET is answered with the value from before the POST landed.
    assert_eq!(page.refresh().await, Completion::Stale);
    assert!(page.state().count.is_none());
    assert!(page.state().loading);

    release.send(()).unwrap();
    assert_eq!(handle.await.unwrap(), Completion::Applied);

    let state = page.state();
    assert_eq!(state.count, Some(6));
    assert_eq!(state.message, "incremented");
    assert!(!state.loading);
}

#[tokio::test]
async fn subscribers_see_loading_transition() {
    let page = page();
    let mut rx = page.subscribe();
    let release = page.transport().gated_reply(counter(9, "incremented"));

    let handle = page.press_increment().unwrap();
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().loading);

    release.send(()).unwrap();
    handle.await.unwrap();
    rx.changed().await.unwrap();
    let shown = rx.borrow_and_update().clone();
    assert!(!shown.loading);
    assert_eq!(shown.count, Some(9));
}

#[tokio::test]
async fn repeated_refresh_is_stable() {
    let page = page();
    page.transport().reply(counter(4, "Current count"));
    page.transport().reply(counter(4, "Current count"));

    page.refresh().await;
    let first = page.state();
    page.refresh().await;
    assert_eq!(page.state(), first);
}

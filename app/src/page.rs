//! The counter page: one `CounterSession` driven over an async transport.
//!
//! # Design
//! The session lives behind a mutex that is only held for synchronous
//! updates, never across a network call. After every update the visible
//! `CounterState` is published on a `watch` channel, so a renderer can follow
//! along (including the `loading` flag going up before a request resolves).
//!
//! `increment` is the data-layer operation and does not refuse overlapping
//! calls. `press_increment` is the trigger a front-end binds to its button:
//! it is disabled while an increment is in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use counter_core::{Completion, CounterClient, CounterSession, CounterState, Operation, Ticket};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::transport::Transport;

pub struct CounterPage<T> {
    client: CounterClient,
    transport: T,
    session: Mutex<CounterSession>,
    published: watch::Sender<CounterState>,
    activated: AtomicBool,
}

impl<T: Transport> CounterPage<T> {
    pub fn new(config: &Config, transport: T) -> Self {
        Self {
            client: CounterClient::new(&config.base_url),
            transport,
            session: Mutex::new(CounterSession::new()),
            published: watch::Sender::new(CounterState::default()),
            activated: AtomicBool::new(false),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Snapshot of what the page currently shows.
    pub fn state(&self) -> CounterState {
        self.published.borrow().clone()
    }

    /// Receives every distinct state the page goes through.
    pub fn subscribe(&self) -> watch::Receiver<CounterState> {
        self.published.subscribe()
    }

    /// First-activation hook: fetches the counter once. Later calls do
    /// nothing and return `false`.
    pub async fn activate(&self) -> bool {
        if self.activated.swap(true, Ordering::SeqCst) {
            debug!("page already active");
            return false;
        }
        info!(base_url = self.client.base_url(), "page activated");
        self.refresh().await;
        true
    }

    pub async fn refresh(&self) -> Completion {
        let ticket = self.update(|session| session.begin(Operation::Refresh));
        self.settle(ticket).await
    }

    /// `loading` is raised before the request is sent and lowered once the
    /// outcome has been recorded.
    pub async fn increment(&self) -> Completion {
        let ticket = self.update(|session| session.begin(Operation::Increment));
        self.settle(ticket).await
    }

    /// Button handler. Returns `None` without sending anything while an
    /// increment is already in flight; otherwise `loading` is already set when
    /// this returns and the request runs on a spawned task.
    pub fn press_increment(self: &Arc<Self>) -> Option<JoinHandle<Completion>> {
        let ticket = self.update(|session| {
            (!session.state().loading).then(|| session.begin(Operation::Increment))
        });
        let Some(ticket) = ticket else {
            info!("increment ignored, one is already in flight");
            return None;
        };
        let page = Arc::clone(self);
        Some(tokio::spawn(async move { page.settle(ticket).await }))
    }

    async fn settle(&self, ticket: Ticket) -> Completion {
        let request = self.client.build_request(ticket.operation);
        let outcome = match self.transport.execute(request).await {
            Ok(response) => self.client.parse_counter(response),
            Err(failure) => Err(failure),
        };
        if let Err(failure) = &outcome {
            warn!(operation = ?ticket.operation, seq = ticket.seq, %failure, "counter request failed");
        }

        let completion = self.update(|session| session.complete(ticket, outcome));
        if completion == Completion::Stale {
            debug!(seq = ticket.seq, "response arrived after a newer one");
        }
        completion
    }

    fn update<R>(&self, f: impl FnOnce(&mut CounterSession) -> R) -> R {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let out = f(&mut session);
        let current = session.state();
        self.published.send_if_modified(|shown| {
            if *shown == *current {
                return false;
            }
            *shown = current.clone();
            true
        });
        out
    }
}

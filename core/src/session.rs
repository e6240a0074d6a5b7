//! Observable counter state plus the bookkeeping that decides which
//! responses may touch it.
//!
//! # Design
//! A host starts an operation with `begin`, performs the round-trip, and
//! hands the outcome back through `complete`. Each `begin` hands out a
//! `Ticket` with a strictly increasing sequence number. An outcome is applied
//! only when its ticket is newer than every outcome applied so far, so
//! overlapping calls that resolve out of order never move the display back
//! to an older value.
//!
//! A refresh started while an increment is in flight may be answered with the
//! count from either side of that increment, so its outcome is dropped. This
//! also means no applied refresh can outrank an increment still in flight.
//!
//! `loading` is derived from the number of increments in flight and is
//! cleared when the last one settles, whether it was applied or discarded.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::RequestFailure;
use crate::types::{CounterResponse, CounterState, Operation};

/// Handle for one started operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub seq: u64,
    pub operation: Operation,
}

/// What `complete` did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer outcome had already been applied, or the outcome was a
    /// refresh that overlapped an increment; it was dropped.
    Stale,
    /// The ticket was not handed out by this session; nothing changed.
    Unissued,
}

#[derive(Debug, Clone)]
pub struct CounterSession {
    state: CounterState,
    next_seq: u64,
    newest_applied: u64,
    increments_in_flight: u32,
    overlapping_refreshes: BTreeSet<u64>,
}

impl Default for CounterSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSession {
    pub fn new() -> Self {
        Self {
            state: CounterState::default(),
            next_seq: 1,
            newest_applied: 0,
            increments_in_flight: 0,
            overlapping_refreshes: BTreeSet::new(),
        }
    }

    pub fn state(&self) -> &CounterState {
        &self.state
    }

    pub fn increments_in_flight(&self) -> u32 {
        self.increments_in_flight
    }

    /// Start an operation. Increments raise `loading` immediately.
    pub fn begin(&mut self, operation: Operation) -> Ticket {
        let ticket = Ticket {
            seq: self.next_seq,
            operation,
        };
        self.next_seq += 1;
        match operation {
            Operation::Increment => {
                self.increments_in_flight += 1;
                self.state.loading = true;
            }
            Operation::Refresh if self.increments_in_flight > 0 => {
                self.overlapping_refreshes.insert(ticket.seq);
            }
            Operation::Refresh => {}
        }
        ticket
    }

    /// Settle an operation started with `begin`.
    ///
    /// On success `count` and `message` come from the response. On failure
    /// only `message` changes, to the operation's error prefix followed by the
    /// failure detail.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<CounterResponse, RequestFailure>,
    ) -> Completion {
        if ticket.seq == 0 || ticket.seq >= self.next_seq {
            debug!(seq = ticket.seq, next = self.next_seq, "ignoring unissued ticket");
            return Completion::Unissued;
        }

        match ticket.operation {
            Operation::Increment => {
                self.increments_in_flight = self.increments_in_flight.saturating_sub(1);
                self.state.loading = self.increments_in_flight > 0;
            }
            Operation::Refresh => {
                if self.overlapping_refreshes.remove(&ticket.seq) {
                    debug!(seq = ticket.seq, "dropping refresh that overlapped an increment");
                    return Completion::Stale;
                }
            }
        }

        if ticket.seq <= self.newest_applied {
            debug!(
                seq = ticket.seq,
                newest = self.newest_applied,
                "discarding stale counter outcome"
            );
            return Completion::Stale;
        }
        self.newest_applied = ticket.seq;

        match outcome {
            Ok(response) => {
                self.state.count = Some(response.count);
                self.state.message = response.message;
            }
            Err(failure) => {
                self.state.message = format!("{}: {failure}", ticket.operation.failure_prefix());
            }
        }
        Completion::Applied
    }
}

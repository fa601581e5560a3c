//! Session ready-state machine
//!
//! A session moves through a strictly ordered lifecycle:
//!
//! ```text
//! Connecting ──► Open ──► Closing ──► Closed
//!     │           │                     ▲
//!     └───────────┴─────────────────────┘
//! ```
//!
//! `Connecting` is always the first observable state, `Closed` is terminal,
//! and no state repeats. Transitions are fanned out to subscribers over a
//! `tokio::sync::broadcast` channel: late subscribers do not see history but
//! do see every subsequent transition, and the stream ends once `Closed` has
//! been emitted.

use std::sync::Mutex;

use tokio::sync::{broadcast, watch};

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// Connection attempt (or retry) in progress
    Connecting,
    /// Transport established, media stream available
    Open,
    /// Teardown in progress
    Closing,
    /// Terminal; the session will never produce another state
    Closed,
}

impl ReadyState {
    /// Whether the lifecycle permits moving from `self` to `next`
    pub fn can_transition_to(self, next: ReadyState) -> bool {
        matches!(
            (self, next),
            (ReadyState::Connecting, ReadyState::Open)
                | (ReadyState::Connecting, ReadyState::Closing)
                | (ReadyState::Connecting, ReadyState::Closed)
                | (ReadyState::Open, ReadyState::Closing)
                | (ReadyState::Open, ReadyState::Closed)
                | (ReadyState::Closing, ReadyState::Closed)
        )
    }

    /// Whether this state ends the lifecycle
    pub fn is_terminal(self) -> bool {
        self == ReadyState::Closed
    }
}

impl std::fmt::Display for ReadyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadyState::Connecting => f.write_str("connecting"),
            ReadyState::Open => f.write_str("open"),
            ReadyState::Closing => f.write_str("closing"),
            ReadyState::Closed => f.write_str("closed"),
        }
    }
}

/// Subscriber handle to a session's live state feed
///
/// Obtained from [`Session::ready_state`](crate::session::Session::ready_state).
/// May be attached at any point in the lifecycle; yields every transition that
/// happens after attachment and `None` forever once the session has closed.
#[derive(Debug)]
pub struct ReadyStateStream {
    rx: broadcast::Receiver<ReadyState>,
}

impl ReadyStateStream {
    /// Wait for the next state transition
    ///
    /// Returns `None` once the session has emitted `Closed` and all buffered
    /// transitions have been drained.
    pub async fn recv(&mut self) -> Option<ReadyState> {
        loop {
            match self.rx.recv().await {
                Ok(state) => return Some(state),
                Err(broadcast::error::RecvError::Closed) => return None,
                // Cannot happen with a 4-state lifecycle and our channel
                // capacity, but a lagged subscriber just keeps reading.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
            }
        }
    }
}

struct CellInner {
    current: ReadyState,
    announced: bool,
    tx: Option<broadcast::Sender<ReadyState>>,
}

/// Shared state holder driving a session's lifecycle
///
/// Guards transitions against the lifecycle order and fans them out to
/// subscribers. Also keeps a `watch` mirror of the current state so internal
/// waiters (`Session::stream`) can await a particular state without racing
/// the broadcast feed.
pub(crate) struct StateCell {
    inner: Mutex<CellInner>,
    watch_tx: watch::Sender<ReadyState>,
}

impl StateCell {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(8);
        let (watch_tx, _) = watch::channel(ReadyState::Connecting);
        Self {
            inner: Mutex::new(CellInner {
                current: ReadyState::Connecting,
                announced: false,
                tx: Some(tx),
            }),
            watch_tx,
        }
    }

    pub(crate) fn current(&self) -> ReadyState {
        self.inner.lock().unwrap().current
    }

    pub(crate) fn subscribe(&self) -> ReadyStateStream {
        let inner = self.inner.lock().unwrap();
        let rx = match &inner.tx {
            Some(tx) => tx.subscribe(),
            // Already closed: hand out a stream that ends immediately.
            None => broadcast::channel(1).1,
        };
        ReadyStateStream { rx }
    }

    pub(crate) fn watch(&self) -> watch::Receiver<ReadyState> {
        self.watch_tx.subscribe()
    }

    /// Emit the initial `Connecting` state to subscribers attached before
    /// `connect` was called. Only the first call has an effect.
    pub(crate) fn announce(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.announced {
            return;
        }
        inner.announced = true;
        let current = inner.current;
        if let Some(tx) = &inner.tx {
            let _ = tx.send(current);
        }
    }

    /// Attempt a lifecycle transition
    ///
    /// Returns `false` (and emits nothing) if the transition is not permitted
    /// from the current state. On `Closed` the broadcast sender is dropped so
    /// subscriber streams terminate.
    pub(crate) fn transition(&self, next: ReadyState) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if !inner.current.can_transition_to(next) {
            return false;
        }
        inner.current = next;
        inner.announced = true;
        if let Some(tx) = &inner.tx {
            let _ = tx.send(next);
        }
        if next.is_terminal() {
            inner.tx = None;
        }
        drop(inner);
        // send_replace stores the value even when no receiver is attached
        // yet, so a later `watch()` subscriber never sees a stale state.
        let _ = self.watch_tx.send_replace(next);
        true
    }
}

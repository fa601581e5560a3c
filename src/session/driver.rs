//! Session lifecycle driver
//!
//! [`Session`] owns the connect/retry loop and the ready-state machine for a
//! single destination. The wire protocol itself lives behind the
//! [`Transport`] seam; this driver decides when to attempt, when to back off,
//! when to give up, and what the caller observes at each step.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use tokio::sync::watch;
use url::Url;

use crate::error::{Error, Result};
use crate::stream::MediaStream;

use super::mode::SessionMode;
use super::retry::{RetryPolicy, DEFAULT_MAX_RETRY_COUNT};
use super::state::{ReadyState, ReadyStateStream, StateCell};
use super::transport::Transport;

/// One attempted-or-established streaming session
///
/// Built by a [`SessionBuilder`](crate::registry::SessionBuilder); the
/// constructor performs no I/O. A session is exclusively owned by its caller:
/// methods take `&self` so `connect` and `close` can be driven from
/// cooperating tasks (wrap in `Arc` for that), but sharing one session across
/// independent callers is out of contract.
///
/// Lifecycle, as observed on [`ready_state`](Session::ready_state):
/// `Connecting`, then either `Open` (and later `Closing`/`Closed` on
/// teardown) or `Closed` once the retry budget is exhausted.
pub struct Session {
    uri: Url,
    mode: SessionMode,
    retry_policy: RetryPolicy,
    max_retry_count: AtomicU32,
    connect_started: AtomicBool,
    state: StateCell,
    transport: tokio::sync::Mutex<Option<Box<dyn Transport>>>,
    stream_slot: Mutex<Option<MediaStream>>,
    close_tx: watch::Sender<bool>,
}

impl Session {
    pub(crate) fn new(
        uri: Url,
        mode: SessionMode,
        retry_policy: RetryPolicy,
        transport: Box<dyn Transport>,
    ) -> Self {
        let (close_tx, _) = watch::channel(false);
        Self {
            uri,
            mode,
            retry_policy,
            max_retry_count: AtomicU32::new(DEFAULT_MAX_RETRY_COUNT),
            connect_started: AtomicBool::new(false),
            state: StateCell::new(),
            transport: tokio::sync::Mutex::new(Some(transport)),
            stream_slot: Mutex::new(None),
            close_tx,
        }
    }

    /// Destination this session was built for
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Directionality fixed at build time
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Snapshot of the current lifecycle state
    pub fn current_state(&self) -> ReadyState {
        self.state.current()
    }

    /// Subscribe to the live state feed
    ///
    /// Late subscribers do not see transitions that already happened, but see
    /// every subsequent one; the stream ends after `Closed`.
    pub fn ready_state(&self) -> ReadyStateStream {
        self.state.subscribe()
    }

    /// Override the retry budget
    ///
    /// The budget counts retries after the initial attempt, so a budget of
    /// `n` allows `n + 1` connection attempts in total. May be called before
    /// or after `connect`; a change made while the retry loop is running
    /// applies to retry decisions not yet taken.
    pub fn set_max_retry_count(&self, count: u32) {
        self.max_retry_count.store(count, Ordering::Relaxed);
    }

    /// Current retry budget
    pub fn max_retry_count(&self) -> u32 {
        self.max_retry_count.load(Ordering::Relaxed)
    }

    /// Establish the session
    ///
    /// Suspends until the first definitive outcome: `Open` on success, or
    /// `Closed` once the retry budget is exhausted. Transient connect
    /// failures are retried internally with backoff and never surface as
    /// errors; terminal failure is reported through the state stream plus
    /// exactly one invocation of `on_disconnected`, and `connect` still
    /// returns `Ok(())`.
    ///
    /// `on_disconnected` is not invoked on caller-driven [`close`](Session::close).
    ///
    /// Calling `connect` a second time while the session is connecting or
    /// open returns [`Error::AlreadyConnected`]; after the session has
    /// closed, [`Error::Closed`].
    pub async fn connect<F>(&self, on_disconnected: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.state.current().is_terminal() {
            return Err(Error::Closed);
        }
        if self.connect_started.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyConnected);
        }

        self.state.announce();
        let mut close_rx = self.close_tx.subscribe();

        let mut transport = match self.transport.lock().await.take() {
            Some(transport) => transport,
            // close() raced us and already consumed the transport
            None => return Ok(()),
        };

        let mut retries_used: u32 = 0;
        loop {
            if *close_rx.borrow() {
                return Ok(());
            }

            tracing::debug!(
                uri = %self.uri,
                mode = %self.mode,
                attempt = retries_used + 1,
                "Connection attempt"
            );

            let outcome = tokio::select! {
                _ = close_rx.changed() => {
                    // Teardown requested mid-attempt; close() drives the
                    // state machine and the abandoned attempt is dropped.
                    return Ok(());
                }
                outcome = transport.connect() => outcome,
            };

            match outcome {
                Ok(stream) => {
                    // Fill the slot before announcing Open so a waiting
                    // stream() cannot observe Open with an empty slot.
                    *self.stream_slot.lock().unwrap() = Some(stream);
                    if self.state.transition(ReadyState::Open) {
                        *self.transport.lock().await = Some(transport);
                        tracing::info!(uri = %self.uri, mode = %self.mode, "Session open");
                    } else {
                        // Teardown raced the successful attempt
                        self.stream_slot.lock().unwrap().take();
                        transport.disconnect().await;
                    }
                    return Ok(());
                }
                Err(error) => {
                    let budget = self.max_retry_count.load(Ordering::Relaxed);
                    if retries_used >= budget {
                        tracing::warn!(
                            uri = %self.uri,
                            attempts = retries_used + 1,
                            error = %error,
                            "Retry budget exhausted, closing session"
                        );
                        if self.state.transition(ReadyState::Closed) {
                            on_disconnected();
                        }
                        return Ok(());
                    }

                    retries_used += 1;
                    let delay = self.retry_policy.delay_for(retries_used);
                    tracing::debug!(
                        uri = %self.uri,
                        retry = retries_used,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Connect failed, backing off"
                    );

                    tokio::select! {
                        _ = close_rx.changed() => {
                            // No retry fires after teardown was requested
                            return Ok(());
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    /// Access the negotiated media stream
    ///
    /// Suspends until the session reaches `Open`, then yields the stream
    /// handle. The handle can be taken once; subsequent calls, and calls on a
    /// session that closed before opening, return [`Error::Closed`].
    pub async fn stream(&self) -> Result<MediaStream> {
        let mut state_rx = self.state.watch();
        loop {
            match *state_rx.borrow_and_update() {
                ReadyState::Open => {
                    return self.stream_slot.lock().unwrap().take().ok_or(Error::Closed);
                }
                ReadyState::Closed => return Err(Error::Closed),
                ReadyState::Connecting | ReadyState::Closing => {}
            }
            if state_rx.changed().await.is_err() {
                return Err(Error::Closed);
            }
        }
    }

    /// Tear the session down
    ///
    /// Drives the state machine through `Closing` to `Closed` from whatever
    /// phase the session is in, cancels any in-flight connection attempt or
    /// pending retry timer, and disconnects the transport if a link was
    /// established. Idempotent; does not invoke the `connect` disconnect
    /// callback.
    pub async fn close(&self) {
        // send_replace marks the close even while no connect loop is
        // subscribed yet.
        let _ = self.close_tx.send_replace(true);

        if self.state.transition(ReadyState::Closing) {
            tracing::debug!(uri = %self.uri, "Session closing");
        }

        if let Some(mut transport) = self.transport.lock().await.take() {
            transport.disconnect().await;
        }
        self.stream_slot.lock().unwrap().take();

        if self.state.transition(ReadyState::Closed) {
            tracing::info!(uri = %self.uri, "Session closed");
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("uri", &self.uri.as_str())
            .field("mode", &self.mode)
            .field("state", &self.state.current())
            .finish()
    }
}

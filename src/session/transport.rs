//! Transport seam for protocol plugins
//!
//! A [`Transport`] is the piece a protocol plugin actually implements: one
//! connection attempt over its wire protocol, producing the negotiated media
//! stream on success. The session driver owns everything above it (retry
//! loop, state machine, cancellation); the transport owns everything below
//! (framing, handshakes, per-attempt timeouts).

use async_trait::async_trait;

use crate::stream::MediaStream;

/// A failed connection attempt
///
/// Opaque to the core: whatever the protocol considers transient (refused,
/// timed out, handshake rejected) ends up here and feeds the retry loop.
#[derive(Debug, Clone)]
pub struct TransportError {
    message: String,
}

impl TransportError {
    /// Create an error with a human-readable reason
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TransportError {}

/// One protocol's bytes-on-the-wire implementation
///
/// Manufactured by a [`SessionFactory`](crate::registry::SessionFactory) for
/// a specific URI/mode/configuration triple. Implementations must not perform
/// network I/O at construction time; all of it happens inside `connect`.
#[async_trait]
pub trait Transport: Send {
    /// Perform a single connection attempt
    ///
    /// Returns the negotiated media stream on success. The attempt owns its
    /// own timeout; the session driver only decides whether to try again.
    async fn connect(&mut self) -> Result<MediaStream, TransportError>;

    /// Tear down an established connection, best effort
    async fn disconnect(&mut self);
}

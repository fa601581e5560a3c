//! Crate error types
//!
//! Configuration errors (bad URI, missing protocol plugin) are raised
//! synchronously by the registry and builder. Network-level failures are
//! never surfaced here; they are absorbed by a session's retry loop and
//! reported through the ready-state stream.

/// Result alias for session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for registry, builder and session operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The destination URI is absent or unparseable
    InvalidUri(String),
    /// No registered factory supports the URI's scheme
    UnsupportedScheme(String),
    /// `connect` was called on a session that is already connecting or open
    AlreadyConnected,
    /// The session reached its terminal state before the operation completed
    Closed,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidUri(uri) => write!(f, "Invalid destination URI: {}", uri),
            Error::UnsupportedScheme(scheme) => {
                write!(f, "No registered factory for scheme: {}", scheme)
            }
            Error::AlreadyConnected => write!(f, "Session is already connecting or open"),
            Error::Closed => write!(f, "Session is closed"),
        }
    }
}

impl std::error::Error for Error {}

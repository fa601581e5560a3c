//! Session lifecycle core
//!
//! A [`Session`] represents one attempted-or-established network session,
//! protocol-agnostic at this layer. The driver owns the connect/retry loop
//! and the ready-state machine; the actual wire protocol sits behind the
//! [`Transport`] trait, manufactured by whichever registered factory claims
//! the destination URI's scheme.

pub mod driver;
pub mod mode;
pub mod retry;
pub mod state;
pub mod transport;

pub use driver::Session;
pub use mode::SessionMode;
pub use retry::{RetryPolicy, DEFAULT_MAX_RETRY_COUNT};
pub use state::{ReadyState, ReadyStateStream};
pub use transport::{Transport, TransportError};

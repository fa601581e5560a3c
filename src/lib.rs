//! Protocol-agnostic streaming session negotiation and lifecycle
//!
//! This crate is the dispatch-and-lifecycle core that concrete streaming
//! protocols (RTMP, SRT, RIST, ...) plug into. Given a destination URI, it
//! selects the registered protocol implementation by URI scheme, drives the
//! connect/retry state machine, and exposes a uniform asynchronous view of
//! the session to callers. It contains no wire-protocol logic of its own.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use stream_session::registry::SessionRegistry;
//! use stream_session::session::SessionMode;
//!
//! # async fn example(srt_factory: Arc<dyn stream_session::registry::SessionFactory>)
//! # -> stream_session::error::Result<()> {
//! // Composition root: one registry, plugins installed at startup
//! let registry = Arc::new(SessionRegistry::new());
//! registry.register(srt_factory);
//!
//! let session = registry
//!     .make("srt://relay.example.com:9000?streamid=live")?
//!     .mode(SessionMode::Publish)
//!     .build()?;
//!
//! session.connect(|| eprintln!("stream lost")).await?;
//! let stream = session.stream().await?;
//! // ... feed frames into `stream` ...
//! session.close().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod registry;
pub mod session;
pub mod stream;

pub use config::SessionConfig;
pub use error::{Error, Result};
pub use registry::{SessionBuilder, SessionFactory, SessionRegistry};
pub use session::{
    ReadyState, ReadyStateStream, RetryPolicy, Session, SessionMode, Transport, TransportError,
};
pub use stream::{Frame, FrameKind, MediaStream};

//! Single-use session builder
//!
//! Minted by [`SessionRegistry::make`](super::SessionRegistry::make) for one
//! destination URI. Accumulates per-connection options, then delegates
//! construction back to the registry and is discarded.

use std::sync::Arc;

use url::Url;

use crate::config::SessionConfig;
use crate::error::Result;
use crate::session::{RetryPolicy, Session, SessionMode};

use super::store::SessionRegistry;

/// Short-lived accumulator of session options
///
/// Setters consume and return the builder so options chain; `build` consumes
/// it for good.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use stream_session::registry::SessionRegistry;
/// use stream_session::session::SessionMode;
///
/// # fn example(registry: Arc<SessionRegistry>) -> stream_session::error::Result<()> {
/// let session = registry
///     .make("srt://relay.example.com:9000")?
///     .mode(SessionMode::Publish)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SessionBuilder {
    registry: Arc<SessionRegistry>,
    uri: Url,
    mode: SessionMode,
    config: Option<SessionConfig>,
    retry_policy: RetryPolicy,
}

impl SessionBuilder {
    pub(crate) fn new(registry: Arc<SessionRegistry>, uri: Url) -> Self {
        Self {
            registry,
            uri,
            mode: SessionMode::Publish,
            config: None,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Set the session direction (default: publish)
    pub fn mode(mut self, mode: SessionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Attach an opaque protocol configuration
    ///
    /// Forwarded untouched to the factory that handles the URI's scheme.
    /// Leaving it unset means the factory's defaults apply.
    pub fn configuration(mut self, config: SessionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the connect backoff schedule
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Materialize the session
    ///
    /// Resolves the URI's scheme against the registry and asks the matching
    /// factory for a transport. Propagates
    /// [`Error::UnsupportedScheme`](crate::error::Error::UnsupportedScheme)
    /// when no factory matches.
    pub fn build(self) -> Result<Session> {
        self.registry
            .build(self.uri, self.mode, self.config, self.retry_policy)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::registry::SessionFactory;
    use crate::session::{ReadyState, Transport, TransportError};
    use crate::stream::MediaStream;

    struct NoopTransport;

    #[async_trait]
    impl Transport for NoopTransport {
        async fn connect(&mut self) -> std::result::Result<MediaStream, TransportError> {
            let (stream, _rx) = MediaStream::publish(1);
            Ok(stream)
        }

        async fn disconnect(&mut self) {}
    }

    #[derive(Debug, PartialEq)]
    struct TestConfig {
        latency_ms: u32,
    }

    /// Records the mode and downcast configuration each build hands over.
    struct RecordingFactory {
        seen: Mutex<Vec<(SessionMode, Option<u32>)>>,
    }

    impl RecordingFactory {
        fn install(registry: &SessionRegistry) -> Arc<Self> {
            let factory = Arc::new(Self {
                seen: Mutex::new(Vec::new()),
            });
            registry.register(Arc::clone(&factory) as Arc<dyn SessionFactory>);
            factory
        }
    }

    impl SessionFactory for RecordingFactory {
        fn schemes(&self) -> &[&str] {
            &["test"]
        }

        fn make_transport(
            &self,
            _uri: &Url,
            mode: SessionMode,
            config: Option<SessionConfig>,
        ) -> Box<dyn Transport> {
            let latency = config
                .as_ref()
                .and_then(|c| c.downcast_ref::<TestConfig>())
                .map(|c| c.latency_ms);
            self.seen.lock().unwrap().push((mode, latency));
            Box::new(NoopTransport)
        }
    }

    #[test]
    fn test_defaults_and_overwrites() {
        let registry = Arc::new(SessionRegistry::new());
        let factory = RecordingFactory::install(&registry);

        // Default mode is publish, configuration absent
        registry.make("test://host").unwrap().build().unwrap();

        // Later setters overwrite earlier ones
        registry
            .make("test://host")
            .unwrap()
            .mode(SessionMode::Publish)
            .mode(SessionMode::Playback)
            .configuration(SessionConfig::new(TestConfig { latency_ms: 80 }))
            .configuration(SessionConfig::new(TestConfig { latency_ms: 2000 }))
            .build()
            .unwrap();

        let seen = factory.seen.lock().unwrap();
        assert_eq!(seen[0], (SessionMode::Publish, None));
        assert_eq!(seen[1], (SessionMode::Playback, Some(2000)));
    }

    #[test]
    fn test_retry_policy_passthrough() {
        let registry = Arc::new(SessionRegistry::new());
        let _factory = RecordingFactory::install(&registry);

        let session = registry
            .make("test://host")
            .unwrap()
            .retry_policy(RetryPolicy::with_base_delay(Duration::from_millis(50)))
            .build()
            .unwrap();

        // Budget default is independent of the backoff schedule
        assert_eq!(session.max_retry_count(), 3);
    }

    #[tokio::test]
    async fn test_independent_builds_share_nothing() {
        let registry = Arc::new(SessionRegistry::new());
        let _factory = RecordingFactory::install(&registry);

        let first = registry
            .make("test://host/a")
            .unwrap()
            .mode(SessionMode::Publish)
            .build()
            .unwrap();
        let second = registry
            .make("test://host/b")
            .unwrap()
            .mode(SessionMode::Playback)
            .build()
            .unwrap();

        let mut second_states = second.ready_state();

        // Driving the first session does not move the second
        first.connect(|| {}).await.unwrap();
        first.close().await;

        assert_eq!(first.current_state(), ReadyState::Closed);
        assert_eq!(second.current_state(), ReadyState::Connecting);
        assert_eq!(second.mode(), SessionMode::Playback);

        // And the second's stream only ever reflects its own lifecycle
        second.close().await;
        assert_eq!(second_states.recv().await, Some(ReadyState::Closing));
        assert_eq!(second_states.recv().await, Some(ReadyState::Closed));
        assert_eq!(second_states.recv().await, None);
    }
}

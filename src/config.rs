//! Opaque per-protocol session configuration
//!
//! The core never looks inside a configuration value. It is carried from the
//! caller through the builder to whichever factory handles the URI's scheme;
//! the factory downcasts it back to its own concrete type.

use std::any::Any;
use std::sync::Arc;

/// Type-erased, cheaply cloneable protocol configuration
///
/// # Example
/// ```
/// use stream_session::config::SessionConfig;
///
/// struct SrtConfig {
///     latency_ms: u32,
/// }
///
/// let config = SessionConfig::new(SrtConfig { latency_ms: 2000 });
/// let srt = config.downcast_ref::<SrtConfig>().unwrap();
/// assert_eq!(srt.latency_ms, 2000);
/// ```
#[derive(Clone)]
pub struct SessionConfig {
    value: Arc<dyn Any + Send + Sync>,
}

impl SessionConfig {
    /// Wrap a protocol-specific configuration value
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
        }
    }

    /// Downcast back to the concrete configuration type
    ///
    /// Returns `None` if the wrapped value is of a different type, which
    /// usually means the caller handed a configuration meant for one protocol
    /// to another protocol's factory.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionConfig(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct FakeConfig {
        latency_ms: u32,
    }

    #[test]
    fn test_downcast_roundtrip() {
        let config = SessionConfig::new(FakeConfig { latency_ms: 250 });

        let inner = config.downcast_ref::<FakeConfig>().unwrap();
        assert_eq!(inner.latency_ms, 250);
    }

    #[test]
    fn test_downcast_wrong_type() {
        let config = SessionConfig::new(FakeConfig { latency_ms: 250 });

        assert!(config.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_clone_shares_value() {
        let config = SessionConfig::new(FakeConfig { latency_ms: 100 });
        let cloned = config.clone();

        let a = config.downcast_ref::<FakeConfig>().unwrap() as *const FakeConfig;
        let b = cloned.downcast_ref::<FakeConfig>().unwrap() as *const FakeConfig;
        assert_eq!(a, b);
    }
}

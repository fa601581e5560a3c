//! Factory registry and scheme dispatch
//!
//! The registry maps destination URIs to the protocol implementation that
//! claims their scheme. It is an explicit, dependency-injected instance:
//! the application's composition root creates one, protocol plugin crates
//! register their factories into it at process start, and it lives (usually
//! behind an `Arc`) for the process lifetime.

use std::sync::{Arc, RwLock};

use url::Url;

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::session::{RetryPolicy, Session, SessionMode};

use super::builder::SessionBuilder;
use super::factory::SessionFactory;

/// Registry of installed protocol factories
///
/// Dispatch scans factories in registration order and picks the first whose
/// scheme set contains the URI's scheme. Registration and dispatch are
/// serialized by an internal lock, so plugins may register concurrently with
/// sessions being built.
pub struct SessionRegistry {
    factories: RwLock<Vec<Arc<dyn SessionFactory>>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(Vec::new()),
        }
    }

    /// Install a protocol factory
    ///
    /// Scheme sets must be disjoint across installed factories: if the new
    /// factory claims any scheme an earlier registration already claims —
    /// exactly or partially — the call is a logged no-op and the earlier
    /// factory keeps winning. Registering the same scheme set twice is
    /// therefore idempotent.
    pub fn register(&self, factory: Arc<dyn SessionFactory>) {
        let mut factories = self.factories.write().unwrap();

        for installed in factories.iter() {
            let overlap = installed.schemes().iter().any(|scheme| {
                factory
                    .schemes()
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(scheme))
            });
            if overlap {
                tracing::warn!(
                    schemes = ?factory.schemes(),
                    installed = ?installed.schemes(),
                    "Factory registration ignored: scheme already claimed"
                );
                return;
            }
        }

        tracing::info!(schemes = ?factory.schemes(), "Protocol factory registered");
        factories.push(factory);
    }

    /// Number of installed factories
    pub fn factory_count(&self) -> usize {
        self.factories.read().unwrap().len()
    }

    /// Mint a single-use builder for a destination URI
    ///
    /// Fails with [`Error::InvalidUri`] if the URI is absent or unparseable.
    /// Scheme resolution happens later, at
    /// [`SessionBuilder::build`](crate::registry::SessionBuilder::build).
    pub fn make(self: &Arc<Self>, uri: &str) -> Result<SessionBuilder> {
        if uri.trim().is_empty() {
            return Err(Error::InvalidUri(uri.to_string()));
        }
        let uri = Url::parse(uri).map_err(|_| Error::InvalidUri(uri.to_string()))?;
        Ok(SessionBuilder::new(Arc::clone(self), uri))
    }

    /// Resolve the URI's scheme to a factory and materialize a session
    ///
    /// First factory in registration order whose scheme set contains the
    /// scheme wins. Fails with [`Error::UnsupportedScheme`] if none match.
    pub(crate) fn build(
        &self,
        uri: Url,
        mode: SessionMode,
        config: Option<SessionConfig>,
        retry_policy: RetryPolicy,
    ) -> Result<Session> {
        let factories = self.factories.read().unwrap();

        let factory = factories
            .iter()
            .find(|factory| {
                factory
                    .schemes()
                    .iter()
                    .any(|scheme| scheme.eq_ignore_ascii_case(uri.scheme()))
            })
            .ok_or_else(|| Error::UnsupportedScheme(uri.scheme().to_string()))?;

        tracing::debug!(uri = %uri, mode = %mode, "Session built");
        let transport = factory.make_transport(&uri, mode, config);
        Ok(Session::new(uri, mode, retry_policy, transport))
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("factories", &self.factory_count())
            .finish()
    }
}

//! Factory trait implemented by protocol plugins

use url::Url;

use crate::config::SessionConfig;
use crate::session::{SessionMode, Transport};

/// A per-protocol component that can manufacture transports for the URI
/// schemes it claims
///
/// Implemented by protocol plugin crates (RTMP, SRT, RIST, ...) and installed
/// into a [`SessionRegistry`](crate::registry::SessionRegistry) once at
/// process start. The core never constructs protocol logic itself.
pub trait SessionFactory: Send + Sync {
    /// URI schemes this factory handles, lowercase (e.g. `["srt", "srtla"]`)
    fn schemes(&self) -> &[&str];

    /// Manufacture a transport for a URI/mode/configuration triple
    ///
    /// The configuration is the caller's opaque value, forwarded verbatim;
    /// `None` means the factory's defaults apply. Must not block or perform
    /// network I/O; connection happens later inside
    /// [`Transport::connect`](crate::session::Transport::connect).
    fn make_transport(
        &self,
        uri: &Url,
        mode: SessionMode,
        config: Option<SessionConfig>,
    ) -> Box<dyn Transport>;
}

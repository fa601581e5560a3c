//! Session directionality

/// Direction of a session's media flow
///
/// Fixed at build time; determines which way the negotiated
/// [`MediaStream`](crate::stream::MediaStream) carries frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionMode {
    /// Caller sends media to the remote end (ingest)
    Publish,
    /// Caller receives media from the remote end
    Playback,
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionMode::Publish => f.write_str("publish"),
            SessionMode::Playback => f.write_str("playback"),
        }
    }
}

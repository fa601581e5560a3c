//! Negotiated media stream handle
//!
//! Once a session reaches `Open`, its transport hands the caller a
//! [`MediaStream`]: a direction-aware channel pair carrying media frames
//! between the caller and the wire. Payloads are `bytes::Bytes`, so frames
//! are cheap to clone and hand across tasks; the data itself is reference
//! counted, not copied.
//!
//! The core never interprets frame contents. A publish-mode stream flows
//! caller → transport, a playback-mode stream flows transport → caller.

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::session::SessionMode;

/// Kind of media frame travelling over an open stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Audio frame
    Audio,
    /// Video frame
    Video,
    /// Out-of-band data (metadata, captions, protocol extensions)
    Data,
}

/// A single media frame
///
/// Cheap to clone: the payload is reference counted.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Kind of frame
    pub kind: FrameKind,
    /// Timestamp in milliseconds
    pub timestamp: u32,
    /// Frame payload (opaque to this crate)
    pub payload: Bytes,
}

impl Frame {
    /// Create an audio frame
    pub fn audio(timestamp: u32, payload: Bytes) -> Self {
        Self {
            kind: FrameKind::Audio,
            timestamp,
            payload,
        }
    }

    /// Create a video frame
    pub fn video(timestamp: u32, payload: Bytes) -> Self {
        Self {
            kind: FrameKind::Video,
            timestamp,
            payload,
        }
    }

    /// Create a data frame
    pub fn data(payload: Bytes) -> Self {
        Self {
            kind: FrameKind::Data,
            timestamp: 0,
            payload,
        }
    }
}

/// Caller-side handle to an open session's media flow
///
/// Constructed by a transport when its connection attempt succeeds. The
/// transport keeps the opposite channel end and moves frames to or from the
/// wire; dropping that end terminates the stream.
#[derive(Debug)]
pub struct MediaStream {
    mode: SessionMode,
    outgoing: Option<mpsc::Sender<Frame>>,
    incoming: Option<mpsc::Receiver<Frame>>,
}

impl MediaStream {
    /// Create a publish-direction stream
    ///
    /// Returns the caller-side handle and the receiver the transport drains
    /// onto the wire.
    pub fn publish(capacity: usize) -> (Self, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(capacity);
        let stream = Self {
            mode: SessionMode::Publish,
            outgoing: Some(tx),
            incoming: None,
        };
        (stream, rx)
    }

    /// Create a playback-direction stream
    ///
    /// Returns the caller-side handle and the sender the transport feeds with
    /// frames arriving from the wire.
    pub fn playback(capacity: usize) -> (Self, mpsc::Sender<Frame>) {
        let (tx, rx) = mpsc::channel(capacity);
        let stream = Self {
            mode: SessionMode::Playback,
            outgoing: None,
            incoming: Some(rx),
        };
        (stream, tx)
    }

    /// Directionality of this stream
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Send a frame toward the wire (publish mode)
    ///
    /// Returns `false` if this is not a publish stream or the transport has
    /// gone away.
    pub async fn send(&self, frame: Frame) -> bool {
        match &self.outgoing {
            Some(tx) => tx.send(frame).await.is_ok(),
            None => false,
        }
    }

    /// Receive the next frame from the wire (playback mode)
    ///
    /// Returns `None` if this is not a playback stream or the transport has
    /// gone away and all buffered frames have been drained.
    pub async fn recv(&mut self) -> Option<Frame> {
        match &mut self.incoming {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_stream_flows_to_transport() {
        let (stream, mut transport_rx) = MediaStream::publish(8);
        assert_eq!(stream.mode(), SessionMode::Publish);

        let sent = stream
            .send(Frame::audio(40, Bytes::from_static(&[0xAF, 0x01])))
            .await;
        assert!(sent);

        let frame = transport_rx.recv().await.unwrap();
        assert_eq!(frame.kind, FrameKind::Audio);
        assert_eq!(frame.timestamp, 40);
    }

    #[tokio::test]
    async fn test_playback_stream_flows_from_transport() {
        let (mut stream, transport_tx) = MediaStream::playback(8);
        assert_eq!(stream.mode(), SessionMode::Playback);

        transport_tx
            .send(Frame::video(0, Bytes::from_static(&[0x17, 0x01])))
            .await
            .unwrap();
        drop(transport_tx);

        let frame = stream.recv().await.unwrap();
        assert_eq!(frame.kind, FrameKind::Video);

        // Transport gone, buffer drained
        assert!(stream.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_wrong_direction_is_inert() {
        let (mut publish, _rx) = MediaStream::publish(1);
        assert!(publish.recv().await.is_none());

        let (playback, _tx) = MediaStream::playback(1);
        assert!(!playback.send(Frame::data(Bytes::new())).await);
    }

    #[tokio::test]
    async fn test_send_after_transport_drop_fails() {
        let (stream, rx) = MediaStream::publish(1);
        drop(rx);

        assert!(!stream.send(Frame::data(Bytes::new())).await);
    }
}

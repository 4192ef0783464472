/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Outbound queue between a session and its socket.
//!
//! The session runs synchronously, so sends are queued here and written by
//! the connection task after each session call.

use bytes::BytesMut;
use tidefix_core::error::{FixError, SessionError};
use tidefix_session::Connection;
use tidefix_transport::FixCodec;
use tokio_util::codec::Encoder;

/// A [`Connection`] that queues frames for the connection task.
#[derive(Debug, Default)]
pub struct Outbox {
    frames: Vec<BytesMut>,
    closed: bool,
}

impl Outbox {
    /// Creates an open, empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of queued frames.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true when nothing is queued.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Moves every queued frame into `dst` through the codec.
    ///
    /// # Errors
    /// Returns an error if a frame exceeds the codec's size limit.
    pub fn drain_into(
        &mut self,
        codec: &mut FixCodec,
        dst: &mut BytesMut,
    ) -> Result<(), tidefix_transport::CodecError> {
        for frame in self.frames.drain(..) {
            codec.encode(frame, dst)?;
        }
        Ok(())
    }
}

impl Connection for Outbox {
    fn send(&mut self, bytes: &[u8]) -> Result<(), FixError> {
        if self.closed {
            return Err(SessionError::Connection("outbox is closed".to_string()).into());
        }
        self.frames.push(BytesMut::from(bytes));
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbox_queues_until_drained() {
        let mut outbox = Outbox::new();
        outbox.send(b"8=FIX.4.2\x0110=000\x01").unwrap();
        outbox.send(b"8=FIX.4.2\x0110=001\x01").unwrap();
        assert_eq!(outbox.len(), 2);

        let mut dst = BytesMut::new();
        outbox.drain_into(&mut FixCodec::new(), &mut dst).unwrap();
        assert!(outbox.is_empty());
        assert_eq!(&dst[..], b"8=FIX.4.2\x0110=000\x018=FIX.4.2\x0110=001\x01");
    }

    #[test]
    fn test_outbox_keeps_frames_queued_before_close() {
        let mut outbox = Outbox::new();
        outbox.send(b"8=FIX.4.2\x0110=000\x01").unwrap();
        outbox.close();
        assert!(outbox.is_closed());
        assert!(outbox.send(b"late").is_err());
        assert_eq!(outbox.len(), 1);
    }
}

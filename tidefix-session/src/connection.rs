/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Outbound side of a session's transport.
//!
//! The session hands complete, framed messages to a [`Connection`]. Reading
//! is driven from outside: the runner feeds inbound frames to
//! [`Session::receive`](crate::Session::receive).

use tidefix_core::error::{FixError, SessionError};

/// Sink for formatted messages.
pub trait Connection {
    /// Hands over one complete message.
    ///
    /// # Errors
    /// Transport failures, or `SessionError::Connection` once closed.
    fn send(&mut self, bytes: &[u8]) -> Result<(), FixError>;

    /// Closes the connection. Further sends fail.
    fn close(&mut self);

    /// Returns true once the connection has been closed.
    fn is_closed(&self) -> bool;
}

/// A connection that keeps every sent message in memory.
#[derive(Debug, Default)]
pub struct RecordingConnection {
    sent: Vec<Vec<u8>>,
    closed: bool,
}

impl RecordingConnection {
    /// Creates an open connection with nothing sent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every message sent so far.
    #[must_use]
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Removes and returns every message sent so far.
    pub fn take_sent(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.sent)
    }
}

impl Connection for RecordingConnection {
    fn send(&mut self, bytes: &[u8]) -> Result<(), FixError> {
        if self.closed {
            return Err(SessionError::Connection("connection is closed".to_string()).into());
        }
        self.sent.push(bytes.to_vec());
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

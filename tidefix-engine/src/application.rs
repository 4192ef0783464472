/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Application callback interface.
//!
//! The session consumes every admin message itself. What reaches the
//! application is the session lifecycle and the accepted application
//! messages, delivered in order on the connection task.

use async_trait::async_trait;
use tidefix_core::types::{BusinessRejectReason, SessionId};
use tidefix_tagvalue::Message;

/// Business-level refusal of an application message.
///
/// Returned from [`Application::from_app`]; the engine answers it with a
/// BusinessMessageReject that references the refused message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectReason {
    /// BusinessRejectReason code.
    pub reason: BusinessRejectReason,
    /// Human-readable rejection text.
    pub text: String,
}

impl RejectReason {
    /// Creates a new rejection reason.
    #[must_use]
    pub fn new(reason: BusinessRejectReason, text: impl Into<String>) -> Self {
        Self {
            reason,
            text: text.into(),
        }
    }
}

/// Application callback interface for handling FIX sessions.
///
/// Implement this trait to receive callbacks for session events
/// and message processing.
#[async_trait]
pub trait Application: Send + Sync {
    /// Called once the session has been restored from its store, before
    /// the Logon is sent.
    ///
    /// # Arguments
    /// * `session_id` - The session identifier
    async fn on_create(&self, session_id: &SessionId);

    /// Called when the Logon exchange completes.
    ///
    /// # Arguments
    /// * `session_id` - The session identifier
    async fn on_logon(&self, session_id: &SessionId);

    /// Called when the session logs out.
    ///
    /// # Arguments
    /// * `session_id` - The session identifier
    async fn on_logout(&self, session_id: &SessionId);

    /// Called when an application message is accepted.
    ///
    /// # Arguments
    /// * `message` - The received message
    /// * `session_id` - The session identifier
    ///
    /// # Returns
    /// `Ok(())` to accept, `Err(RejectReason)` to answer with a
    /// BusinessMessageReject.
    #[allow(clippy::wrong_self_convention)]
    async fn from_app(&self, message: &Message, session_id: &SessionId)
    -> Result<(), RejectReason>;
}

/// Default no-op application implementation.
#[derive(Debug, Default)]
pub struct NoOpApplication;

#[async_trait]
impl Application for NoOpApplication {
    async fn on_create(&self, _session_id: &SessionId) {}

    async fn on_logon(&self, _session_id: &SessionId) {}

    async fn on_logout(&self, _session_id: &SessionId) {}

    async fn from_app(
        &self,
        _message: &Message,
        _session_id: &SessionId,
    ) -> Result<(), RejectReason> {
        Ok(())
    }
}

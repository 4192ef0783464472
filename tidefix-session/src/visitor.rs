/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Delivery of inbound messages that the session does not consume itself.

use tidefix_core::types::SessionId;
use tidefix_tagvalue::Message;
use tracing::debug;

/// Receives application messages and lifecycle events from a session.
pub trait MessageVisitor {
    /// Called for every accepted application message while the application
    /// is available.
    fn visit_application(&mut self, message: &Message);

    /// Called when the Logon exchange completes.
    fn on_logon(&mut self, _session: &SessionId) {}

    /// Called when the session logs out.
    fn on_logout(&mut self, _session: &SessionId) {}
}

/// Visitor that logs and drops application messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessageVisitor;

impl MessageVisitor for DefaultMessageVisitor {
    fn visit_application(&mut self, message: &Message) {
        debug!(msg_type = %message.msg_type(), seq = ?message.seq_num(), "ignoring application message");
    }
}

/// Collecting visitor: keeps every application message in order.
impl MessageVisitor for Vec<Message> {
    fn visit_application(&mut self, message: &Message) {
        self.push(message.clone());
    }
}

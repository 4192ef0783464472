/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! In-memory sequence store implementation.
//!
//! Suitable for tests and for sessions that always start from sequence 1.

use crate::traits::{SequenceState, SessionStore};
use parking_lot::RwLock;
use std::collections::HashMap;
use tidefix_core::error::StoreError;
use tidefix_core::types::{CompId, SeqNum, SessionId};

type SessionKey = (CompId, CompId);

/// In-memory sequence store.
///
/// Not persistent: all data is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<SessionKey, SequenceState>>,
}

impl MemoryStore {
    /// Creates a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with the counters of one session.
    ///
    /// # Arguments
    /// * `session` - The session to seed
    /// * `state` - Its initial counters
    #[must_use]
    pub fn with_state(session: &SessionId, state: SequenceState) -> Self {
        let store = Self::new();
        store.sessions.write().insert(key(session), state);
        store
    }

    /// Returns the number of sessions with saved counters.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}

fn key(session: &SessionId) -> SessionKey {
    (session.sender_comp_id.clone(), session.target_comp_id.clone())
}

impl SessionStore for MemoryStore {
    fn load(&self, session: &SessionId) -> Result<Option<SequenceState>, StoreError> {
        Ok(self.sessions.read().get(&key(session)).copied())
    }

    fn save(&self, session: &SessionId, state: SequenceState) -> Result<(), StoreError> {
        self.sessions.write().insert(key(session), state);
        Ok(())
    }

    fn reset_outgoing_seq(
        &self,
        sender: &CompId,
        target: &CompId,
        incoming: SeqNum,
        outgoing: SeqNum,
    ) -> Result<(), StoreError> {
        self.sessions.write().insert(
            (sender.clone(), target.clone()),
            SequenceState::new(incoming, outgoing),
        );
        Ok(())
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Sequence store trait definition.
//!
//! A store persists the two sequence counters of each session so that a
//! restarted session resumes where it left off.

use serde::{Deserialize, Serialize};
use tidefix_core::error::StoreError;
use tidefix_core::types::{CompId, SeqNum, SessionId};

/// The persisted sequence counters of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceState {
    /// Next sequence number expected from the counterparty.
    pub incoming: SeqNum,
    /// Next sequence number this side will send.
    pub outgoing: SeqNum,
}

impl SequenceState {
    /// Creates a sequence state.
    #[must_use]
    pub const fn new(incoming: SeqNum, outgoing: SeqNum) -> Self {
        Self { incoming, outgoing }
    }
}

impl Default for SequenceState {
    fn default() -> Self {
        Self::new(SeqNum::new(1), SeqNum::new(1))
    }
}

/// Abstract interface for sequence number persistence.
///
/// Sessions are keyed by their SenderCompID and TargetCompID.
pub trait SessionStore: Send + Sync {
    /// Loads the counters of a session.
    ///
    /// # Returns
    /// `None` if nothing has been saved for this session yet.
    ///
    /// # Errors
    /// Returns `StoreError` if the stored state cannot be read.
    fn load(&self, session: &SessionId) -> Result<Option<SequenceState>, StoreError>;

    /// Saves the counters of a session.
    ///
    /// # Errors
    /// Returns `StoreError` if the state cannot be written.
    fn save(&self, session: &SessionId, state: SequenceState) -> Result<(), StoreError>;

    /// Overwrites the counters after a local sequence reset.
    ///
    /// # Arguments
    /// * `sender` - SenderCompID of the session
    /// * `target` - TargetCompID of the session
    /// * `incoming` - Next expected incoming sequence number
    /// * `outgoing` - Next outgoing sequence number
    ///
    /// # Errors
    /// Returns `StoreError` if the state cannot be written.
    fn reset_outgoing_seq(
        &self,
        sender: &CompId,
        target: &CompId,
        incoming: SeqNum,
        outgoing: SeqNum,
    ) -> Result<(), StoreError>;
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Sequence number management.
//!
//! The manager is owned by a single session and mutated through `&mut self`;
//! the session is the only writer of both counters.

use tidefix_core::types::SeqNum;
use tidefix_store::SequenceState;

/// Manages sequence numbers for a FIX session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceManager {
    /// Next expected incoming sequence number.
    incoming: SeqNum,
    /// Next outgoing sequence number.
    outgoing: SeqNum,
}

impl SequenceManager {
    /// Creates a new sequence manager with sequence numbers starting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            incoming: SeqNum::new(1),
            outgoing: SeqNum::new(1),
        }
    }

    /// Creates a new sequence manager with specified starting values.
    ///
    /// # Arguments
    /// * `incoming` - Next expected incoming sequence number
    /// * `outgoing` - Next outgoing sequence number
    #[must_use]
    pub const fn with_initial(incoming: SeqNum, outgoing: SeqNum) -> Self {
        Self { incoming, outgoing }
    }

    /// Returns the next expected incoming sequence number.
    #[inline]
    #[must_use]
    pub const fn incoming(&self) -> SeqNum {
        self.incoming
    }

    /// Returns the next outgoing sequence number.
    #[inline]
    #[must_use]
    pub const fn outgoing(&self) -> SeqNum {
        self.outgoing
    }

    /// Sets the next expected incoming sequence number.
    #[inline]
    pub fn set_incoming(&mut self, seq: SeqNum) {
        self.incoming = seq;
    }

    /// Sets the next outgoing sequence number.
    #[inline]
    pub fn set_outgoing(&mut self, seq: SeqNum) {
        self.outgoing = seq;
    }

    /// Accepts the expected incoming message.
    #[inline]
    pub fn increment_incoming(&mut self) {
        self.incoming = self.incoming.next();
    }

    /// Counts one sent message.
    #[inline]
    pub fn increment_outgoing(&mut self) {
        self.outgoing = self.outgoing.next();
    }

    /// Consumes `seq` without processing it, so the counterparty is not
    /// asked to resend a message that was already rejected.
    #[inline]
    pub fn consume(&mut self, seq: SeqNum) {
        self.incoming = self.incoming.max(seq.next());
    }

    /// Moves the incoming counter forward to `seq`; never moves it back.
    #[inline]
    pub fn advance_incoming_to(&mut self, seq: SeqNum) {
        self.incoming = self.incoming.max(seq);
    }

    /// Resets both sequence numbers to 1.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns true for a sequence number below the expected one that is
    /// not marked as a possible duplicate.
    #[inline]
    #[must_use]
    pub fn is_too_low_seq_num(&self, seq: SeqNum, poss_dup: bool) -> bool {
        !poss_dup && seq < self.incoming
    }

    /// Classifies an incoming sequence number against the expected one.
    ///
    /// # Arguments
    /// * `received` - MsgSeqNum of the inbound message
    /// * `poss_dup` - Whether PossDupFlag is `Y`
    #[must_use]
    pub fn check(&self, received: SeqNum, poss_dup: bool) -> SequenceCheck {
        let expected = self.incoming;
        if received == expected {
            SequenceCheck::Expected
        } else if received > expected {
            SequenceCheck::Gap { expected, received }
        } else if poss_dup {
            SequenceCheck::Duplicate { expected, received }
        } else {
            SequenceCheck::TooLow { expected, received }
        }
    }

    /// Returns the counters in their persisted form.
    #[must_use]
    pub const fn state(&self) -> SequenceState {
        SequenceState::new(self.incoming, self.outgoing)
    }

    /// Restores counters loaded from a store.
    pub fn restore(&mut self, state: SequenceState) {
        self.incoming = state.incoming;
        self.outgoing = state.outgoing;
    }
}

impl Default for SequenceManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of an incoming sequence number check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceCheck {
    /// Sequence number is as expected.
    Expected,
    /// Sequence number is higher than expected.
    Gap {
        /// Expected sequence number.
        expected: SeqNum,
        /// Received sequence number.
        received: SeqNum,
    },
    /// Lower than expected and marked PossDup: an already seen message.
    Duplicate {
        /// Expected sequence number.
        expected: SeqNum,
        /// Received sequence number.
        received: SeqNum,
    },
    /// Lower than expected without PossDup: a fatal protocol violation.
    TooLow {
        /// Expected sequence number.
        expected: SeqNum,
        /// Received sequence number.
        received: SeqNum,
    },
}

impl SequenceCheck {
    /// Returns true if the sequence is valid.
    #[must_use]
    pub const fn is_expected(&self) -> bool {
        matches!(self, Self::Expected)
    }

    /// Returns true if there's a gap.
    #[must_use]
    pub const fn is_gap(&self) -> bool {
        matches!(self, Self::Gap { .. })
    }

    /// Returns true if the sequence is too low.
    #[must_use]
    pub const fn is_too_low(&self) -> bool {
        matches!(self, Self::TooLow { .. })
    }
}

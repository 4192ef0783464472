/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Session lifecycle states.
//!
//! ```text
//! Disconnected -> LoggingOn -> Active -> LoggingOut -> Disconnected
//! ```
//!
//! An acceptor goes straight from `Disconnected` to `Active` when it answers
//! a Logon. Any state may drop to `Disconnected` on a fatal error.

use std::fmt;
use tidefix_core::error::SessionError;

/// Lifecycle state of a FIX session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No logon in progress; waiting for a Logon as acceptor.
    #[default]
    Disconnected,
    /// Logon sent, awaiting the counterparty's Logon.
    LoggingOn,
    /// Session is fully established.
    Active,
    /// Logout sent, awaiting the counterparty's Logout.
    LoggingOut,
}

impl SessionState {
    /// Returns true once the Logon exchange has completed.
    #[inline]
    #[must_use]
    pub const fn is_logged_on(self) -> bool {
        matches!(self, Self::Active | Self::LoggingOut)
    }

    /// Returns the state name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::LoggingOn => "LoggingOn",
            Self::Active => "Active",
            Self::LoggingOut => "LoggingOut",
        }
    }

    /// Checks that the session is in `expected`.
    ///
    /// # Errors
    /// `SessionError::InvalidState` naming both states otherwise.
    pub fn expect(self, expected: Self) -> Result<(), SessionError> {
        if self == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                expected: expected.to_string(),
                current: self.to_string(),
            })
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

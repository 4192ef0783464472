/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FIX protocol versions and their BeginString values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// FIX tag/value protocol version.
///
/// A session accepts only messages whose BeginString matches its configured
/// version exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    /// FIX 4.0
    Fix40,
    /// FIX 4.1
    Fix41,
    /// FIX 4.2
    #[default]
    Fix42,
    /// FIX 4.3
    Fix43,
    /// FIX 4.4
    Fix44,
    /// FIXT 1.1 (transport layer for FIX 5.0+)
    Fixt11,
}

impl Version {
    /// Returns the BeginString value for this version.
    #[must_use]
    pub const fn begin_string(&self) -> &'static str {
        match self {
            Self::Fix40 => "FIX.4.0",
            Self::Fix41 => "FIX.4.1",
            Self::Fix42 => "FIX.4.2",
            Self::Fix43 => "FIX.4.3",
            Self::Fix44 => "FIX.4.4",
            Self::Fixt11 => "FIXT.1.1",
        }
    }

    /// Looks up a version by its exact BeginString.
    #[must_use]
    pub fn from_begin_string(begin_string: &str) -> Option<Self> {
        match begin_string {
            "FIX.4.0" => Some(Self::Fix40),
            "FIX.4.1" => Some(Self::Fix41),
            "FIX.4.2" => Some(Self::Fix42),
            "FIX.4.3" => Some(Self::Fix43),
            "FIX.4.4" => Some(Self::Fix44),
            "FIXT.1.1" => Some(Self::Fixt11),
            _ => None,
        }
    }

    /// Returns true if this version uses FIXT transport.
    #[must_use]
    pub const fn uses_fixt(&self) -> bool {
        matches!(self, Self::Fixt11)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.begin_string())
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_begin_string(s).ok_or_else(|| format!("unknown BeginString: {s}"))
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Core types for FIX session operations.
//!
//! This module provides fundamental types used throughout the TideFix engine:
//! - [`SeqNum`]: Message sequence number
//! - [`Timestamp`]: UTC timestamp in FIX wire format
//! - [`CompId`]: Component identifier (SenderCompID, TargetCompID)
//! - [`SessionId`]: Identity of a session between two counterparties
//! - [`SessionRejectReason`] and [`BusinessRejectReason`]: reject codes

use crate::field::FieldValue;
use crate::fix_enum;
use arrayvec::ArrayString;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Maximum length for CompID strings in bytes.
pub const COMP_ID_MAX_LEN: usize = 32;

const NANOS_PER_SEC: u64 = 1_000_000_000;
const NANOS_PER_MILLI: u64 = 1_000_000;

/// FIX message sequence number.
///
/// Sequence numbers start at 1 and increment for each message sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct SeqNum(u64);

impl SeqNum {
    /// Creates a new sequence number.
    ///
    /// # Arguments
    /// * `value` - The sequence number value (should be >= 1 for valid FIX messages)
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw sequence number value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the next sequence number.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Checks if this sequence number is valid (>= 1).
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 >= 1
    }
}

impl Default for SeqNum {
    fn default() -> Self {
        Self(1)
    }
}

impl From<u64> for SeqNum {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<SeqNum> for u64 {
    fn from(seq: SeqNum) -> Self {
        seq.0
    }
}

impl From<SeqNum> for FieldValue {
    fn from(seq: SeqNum) -> Self {
        FieldValue::from(seq.0)
    }
}

impl fmt::Display for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// UTC timestamp with nanosecond storage.
///
/// On the wire timestamps are `YYYYMMDD-HH:MM:SS`, with a `.sss` suffix only
/// when the value carries milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Nanoseconds since Unix epoch (1970-01-01 00:00:00 UTC).
    nanos_since_epoch: u64,
}

impl Timestamp {
    /// Creates a timestamp from nanoseconds since Unix epoch.
    ///
    /// # Arguments
    /// * `nanos` - Nanoseconds since 1970-01-01 00:00:00 UTC
    #[inline]
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self {
            nanos_since_epoch: nanos,
        }
    }

    /// Creates a timestamp from milliseconds since Unix epoch.
    ///
    /// # Arguments
    /// * `millis` - Milliseconds since 1970-01-01 00:00:00 UTC
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            nanos_since_epoch: millis * NANOS_PER_MILLI,
        }
    }

    /// Returns the current UTC timestamp.
    #[inline]
    #[must_use]
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Returns nanoseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn as_nanos(self) -> u64 {
        self.nanos_since_epoch
    }

    /// Returns milliseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.nanos_since_epoch / NANOS_PER_MILLI
    }

    /// Drops everything below whole seconds.
    #[inline]
    #[must_use]
    pub const fn truncated_to_seconds(self) -> Self {
        Self::from_nanos(self.nanos_since_epoch - self.nanos_since_epoch % NANOS_PER_SEC)
    }

    /// Shifts the timestamp forward.
    #[inline]
    #[must_use]
    pub const fn plus(self, delta: Duration) -> Self {
        Self::from_nanos(self.nanos_since_epoch.saturating_add(delta.as_nanos() as u64))
    }

    /// Shifts the timestamp backward, saturating at the epoch.
    #[inline]
    #[must_use]
    pub const fn minus(self, delta: Duration) -> Self {
        Self::from_nanos(self.nanos_since_epoch.saturating_sub(delta.as_nanos() as u64))
    }

    /// Returns the absolute distance between two timestamps.
    #[inline]
    #[must_use]
    pub const fn abs_diff(self, other: Self) -> Duration {
        Duration::from_nanos(self.nanos_since_epoch.abs_diff(other.nanos_since_epoch))
    }

    /// Converts to a chrono `DateTime<Utc>`.
    #[must_use]
    pub fn to_datetime(self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(i64::try_from(self.nanos_since_epoch).unwrap_or(i64::MAX))
    }

    /// Formats the timestamp in FIX wire format.
    ///
    /// Format: `YYYYMMDD-HH:MM:SS`, or `YYYYMMDD-HH:MM:SS.sss` when the value
    /// has a millisecond part.
    #[must_use]
    pub fn format_fix(self) -> ArrayString<21> {
        let dt = self.to_datetime();
        let pattern = if self.nanos_since_epoch % NANOS_PER_SEC >= NANOS_PER_MILLI {
            "%Y%m%d-%H:%M:%S%.3f"
        } else {
            "%Y%m%d-%H:%M:%S"
        };
        let mut buf = ArrayString::new();
        let _ = fmt::write(&mut buf, format_args!("{}", dt.format(pattern)));
        buf
    }

    /// Parses a FIX UTCTimestamp.
    ///
    /// Accepts `YYYYMMDD-HH:MM:SS` and `YYYYMMDD-HH:MM:SS.sss`.
    ///
    /// # Returns
    /// `None` if the text does not follow either pattern exactly.
    #[must_use]
    pub fn parse_fix(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        let shape_ok = match bytes.len() {
            17 => true,
            21 => bytes[17] == b'.' && bytes[18..].iter().all(u8::is_ascii_digit),
            _ => false,
        };
        if !shape_ok
            || !bytes[..8].iter().all(u8::is_ascii_digit)
            || bytes[8] != b'-'
            || bytes[11] != b':'
            || bytes[14] != b':'
        {
            return None;
        }
        let pattern = if bytes.len() == 17 {
            "%Y%m%d-%H:%M:%S"
        } else {
            "%Y%m%d-%H:%M:%S%.3f"
        };
        let naive = NaiveDateTime::parse_from_str(text, pattern).ok()?;
        let nanos = naive.and_utc().timestamp_nanos_opt()?;
        u64::try_from(nanos).ok().map(Self::from_nanos)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        let nanos = dt.timestamp_nanos_opt().unwrap_or(0);
        Self {
            nanos_since_epoch: u64::try_from(nanos).unwrap_or(0),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_fix())
    }
}

/// Component identifier for FIX sessions.
///
/// Used for SenderCompID (tag 49), TargetCompID (tag 56), and related fields.
/// Maximum length is 32 characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct CompId(ArrayString<COMP_ID_MAX_LEN>);

impl CompId {
    /// Creates a new CompId from a string slice.
    ///
    /// # Arguments
    /// * `s` - The component identifier string
    ///
    /// # Returns
    /// `Some(CompId)` if the string fits within the maximum length, `None` otherwise.
    #[must_use]
    pub fn new(s: &str) -> Option<Self> {
        ArrayString::from(s).ok().map(Self)
    }

    /// Returns the CompId as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns true if the CompId is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for CompId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CompId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompId {
    type Err = arrayvec::CapacityError<()>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArrayString::try_from(s)
            .map(Self)
            .map_err(|_| arrayvec::CapacityError::new(()))
    }
}

impl From<&CompId> for FieldValue {
    fn from(id: &CompId) -> Self {
        FieldValue::String(id.as_str().to_owned())
    }
}

/// Identity of a session: the protocol version and both CompIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId {
    /// BeginString (FIX version).
    pub begin_string: String,
    /// Sender CompID.
    pub sender_comp_id: CompId,
    /// Target CompID.
    pub target_comp_id: CompId,
}

impl SessionId {
    /// Creates a new session ID.
    #[must_use]
    pub fn new(begin_string: impl Into<String>, sender_comp_id: CompId, target_comp_id: CompId) -> Self {
        Self {
            begin_string: begin_string.into(),
            sender_comp_id,
            target_comp_id,
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}->{}",
            self.begin_string, self.sender_comp_id, self.target_comp_id
        )
    }
}

fix_enum! {
    /// SessionRejectReason (tag 373).
    pub enum SessionRejectReason {
        /// Invalid tag number.
        InvalidTagNumber = "0",
        /// Required tag missing.
        RequiredTagMissing = "1",
        /// Tag not defined for this message type.
        TagNotDefinedForThisMessageType = "2",
        /// Undefined tag.
        UndefinedTag = "3",
        /// Tag specified without a value.
        TagSpecifiedWithoutAValue = "4",
        /// Value is incorrect (out of range) for this tag.
        ValueIsIncorrect = "5",
        /// Incorrect data format for value.
        IncorrectDataFormatForValue = "6",
        /// Decryption problem.
        DecryptionProblem = "7",
        /// Signature problem.
        SignatureProblem = "8",
        /// CompID problem.
        CompIdProblem = "9",
        /// SendingTime accuracy problem.
        SendingTimeAccuracyProblem = "10",
        /// Invalid MsgType.
        InvalidMsgType = "11",
        /// XML validation error.
        XmlValidationError = "12",
        /// Tag appears more than once.
        TagAppearsMoreThanOnce = "13",
        /// Tag specified out of required order.
        TagSpecifiedOutOfRequiredOrder = "14",
        /// Repeating group fields out of order.
        RepeatingGroupFieldsOutOfOrder = "15",
        /// Incorrect NumInGroup count for repeating group.
        IncorrectNumInGroupCount = "16",
        /// Non-data value includes field delimiter.
        NonDataValueIncludesFieldDelimiter = "17",
        /// Other.
        Other = "99",
    }
}

fix_enum! {
    /// BusinessRejectReason (tag 380).
    pub enum BusinessRejectReason {
        /// Other.
        Other = "0",
        /// Unknown ID.
        UnknownId = "1",
        /// Unknown security.
        UnknownSecurity = "2",
        /// Unsupported message type.
        UnsupportedMessageType = "3",
        /// Application not available.
        ApplicationNotAvailable = "4",
        /// Conditionally required field missing.
        ConditionallyRequiredFieldMissing = "5",
        /// Not authorized.
        NotAuthorized = "6",
        /// DeliverTo firm not available at this time.
        DeliverToFirmNotAvailable = "7",
    }
}

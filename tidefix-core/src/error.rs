/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the TideFix session engine.
//!
//! This module provides a unified error hierarchy using `thiserror`. Parse
//! failures are split into two families that the session reacts to
//! differently:
//! - **Garbled**: framing or head fields cannot be trusted, so the message is
//!   dropped without a reply (see [`DecodeError::is_garbled`]).
//! - **Invalid**: the message was identified but its content is wrong, so a
//!   Reject naming a [`SessionRejectReason`] is sent.

use crate::types::SessionRejectReason;
use thiserror::Error;

/// Result type alias using [`FixError`] as the error type.
pub type Result<T> = std::result::Result<T, FixError>;

/// Top-level error type for all TideFix operations.
#[derive(Debug, Error)]
pub enum FixError {
    /// Error during message decoding.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error during message encoding.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Error in session layer operations.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Error in sequence store operations.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error from underlying transport.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while decoding a FIX message or a single field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// One of BeginString, BodyLength or MsgType is not in its fixed position.
    #[error("{name}({tag}): is missing")]
    MissingHeadField {
        /// Tag number of the head field.
        tag: u32,
        /// FIX name of the head field.
        name: &'static str,
    },

    /// A head field is present but empty or malformed.
    #[error("{name}({tag}): {reason}")]
    InvalidHeadField {
        /// Tag number of the head field.
        tag: u32,
        /// FIX name of the head field.
        name: &'static str,
        /// Why the value was refused.
        reason: &'static str,
    },

    /// BodyLength does not point at a parsable CheckSum field.
    #[error("BodyLength(9): does not point at the CheckSum field")]
    InvalidBodyLength,

    /// CheckSum is malformed or does not match the message bytes.
    #[error("CheckSum(10): {reason}")]
    InvalidCheckSum {
        /// Why the checksum was refused.
        reason: String,
    },

    /// A field runs into the end of the message without a delimiter.
    #[error("field at offset {offset} is not terminated by a delimiter")]
    MissingDelimiter {
        /// Byte offset where the unterminated field starts.
        offset: usize,
    },

    /// A tag is not a positive decimal number.
    #[error("invalid tag number: {0}")]
    InvalidTagNumber(String),

    /// The tag is not known to the dictionary at all.
    #[error("Invalid tag number: {tag}")]
    UndefinedTag {
        /// Offending tag.
        tag: u32,
    },

    /// The tag is known but not declared for this message type.
    #[error("Tag not defined for this message: {tag}")]
    TagNotDefinedForMessage {
        /// Offending tag.
        tag: u32,
    },

    /// A header or trailer tag appeared inside the body.
    #[error("Out of order tag: {tag}")]
    OutOfOrderTag {
        /// Offending tag.
        tag: u32,
    },

    /// A required or conditionally required field is absent.
    #[error("Required tag missing: {tag}")]
    MissingRequiredField {
        /// The tag number of the missing field.
        tag: u32,
    },

    /// The tag is present with an empty value.
    #[error("Tag specified without a value: {tag}")]
    TagWithoutValue {
        /// Offending tag.
        tag: u32,
    },

    /// The value is well formed but outside the allowed set.
    #[error("Value is incorrect (out of range) for this tag: {tag}")]
    InvalidValueForTag {
        /// Offending tag.
        tag: u32,
    },

    /// The value does not match the field's data format.
    #[error("Incorrect data format for value: {tag}")]
    IncorrectDataFormat {
        /// Offending tag.
        tag: u32,
    },

    /// The same tag appears twice in one container.
    #[error("Tag appears more than once: {tag}")]
    DuplicateTag {
        /// Offending tag.
        tag: u32,
    },

    /// Repeating group count does not match the entries found.
    #[error("Incorrect NumInGroup count for repeating group: {count_tag} declared {expected}, found {actual}")]
    GroupCountMismatch {
        /// The tag containing the group count.
        count_tag: u32,
        /// Declared number of entries.
        expected: u32,
        /// Number of entries actually parsed.
        actual: u32,
    },

    /// A repeating group entry does not follow its field order.
    #[error("Repeating group fields out of order: {tag}")]
    GroupFieldsOutOfOrder {
        /// Offending tag.
        tag: u32,
    },

    /// A non-data value contains the field delimiter.
    #[error("Non-data value includes field delimiter: {tag}")]
    EmbeddedDelimiter {
        /// Tag whose value carried the delimiter.
        tag: u32,
    },
}

impl DecodeError {
    /// Returns true if no sequence number can be trusted after this error.
    #[must_use]
    pub const fn is_garbled(&self) -> bool {
        matches!(
            self,
            Self::MissingHeadField { .. }
                | Self::InvalidHeadField { .. }
                | Self::InvalidBodyLength
                | Self::InvalidCheckSum { .. }
                | Self::MissingDelimiter { .. }
        )
    }

    /// Maps the error to the SessionRejectReason (tag 373) sent back.
    #[must_use]
    pub const fn reject_reason(&self) -> SessionRejectReason {
        match self {
            Self::InvalidTagNumber(_) => SessionRejectReason::InvalidTagNumber,
            Self::UndefinedTag { .. } => SessionRejectReason::UndefinedTag,
            Self::TagNotDefinedForMessage { .. } => {
                SessionRejectReason::TagNotDefinedForThisMessageType
            }
            Self::OutOfOrderTag { .. } => SessionRejectReason::TagSpecifiedOutOfRequiredOrder,
            Self::MissingRequiredField { .. } => SessionRejectReason::RequiredTagMissing,
            Self::TagWithoutValue { .. } => SessionRejectReason::TagSpecifiedWithoutAValue,
            Self::InvalidValueForTag { .. } => SessionRejectReason::ValueIsIncorrect,
            Self::IncorrectDataFormat { .. } => SessionRejectReason::IncorrectDataFormatForValue,
            Self::DuplicateTag { .. } => SessionRejectReason::TagAppearsMoreThanOnce,
            Self::GroupCountMismatch { .. } => SessionRejectReason::IncorrectNumInGroupCount,
            Self::GroupFieldsOutOfOrder { .. } => {
                SessionRejectReason::RepeatingGroupFieldsOutOfOrder
            }
            Self::EmbeddedDelimiter { .. } => {
                SessionRejectReason::NonDataValueIncludesFieldDelimiter
            }
            Self::MissingHeadField { .. }
            | Self::InvalidHeadField { .. }
            | Self::InvalidBodyLength
            | Self::InvalidCheckSum { .. }
            | Self::MissingDelimiter { .. } => SessionRejectReason::Other,
        }
    }

    /// Returns the tag the error refers to, used as RefTagID (tag 371).
    #[must_use]
    pub const fn ref_tag(&self) -> Option<u32> {
        match self {
            Self::UndefinedTag { tag }
            | Self::TagNotDefinedForMessage { tag }
            | Self::OutOfOrderTag { tag }
            | Self::MissingRequiredField { tag }
            | Self::TagWithoutValue { tag }
            | Self::InvalidValueForTag { tag }
            | Self::IncorrectDataFormat { tag }
            | Self::DuplicateTag { tag }
            | Self::GroupFieldsOutOfOrder { tag }
            | Self::EmbeddedDelimiter { tag }
            | Self::MissingHeadField { tag, .. }
            | Self::InvalidHeadField { tag, .. } => Some(*tag),
            Self::GroupCountMismatch { count_tag, .. } => Some(*count_tag),
            Self::InvalidCheckSum { .. } => Some(10),
            Self::InvalidBodyLength => Some(9),
            Self::InvalidTagNumber(_) | Self::MissingDelimiter { .. } => None,
        }
    }
}

/// Errors raised while building an outbound message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The tag is not declared in the container's schema.
    #[error("tag {tag} is not defined for this container")]
    UnknownField {
        /// The tag number that was set.
        tag: u32,
    },

    /// The tag is declared but is not a repeating group count.
    #[error("tag {tag} is not a repeating group")]
    NotAGroup {
        /// The tag number that was used as a group.
        tag: u32,
    },

    /// The tag is a repeating group count, which is derived from its entries.
    #[error("tag {tag} is a repeating group count and cannot be set directly")]
    GroupCount {
        /// The group count tag.
        tag: u32,
    },

    /// A head field needed to frame the message has not been set.
    #[error("tag {tag} must be set before the message can be formatted")]
    MissingHeadField {
        /// The unset head tag.
        tag: u32,
    },
}

/// Errors in FIX session layer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session is not in the correct state for the operation.
    #[error("invalid session state: expected {expected}, current {current}")]
    InvalidState {
        /// Expected state for the operation.
        expected: String,
        /// Current session state.
        current: String,
    },

    /// Session configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The connection was closed before the bytes could be handed over.
    #[error("connection error: {0}")]
    Connection(String),
}

/// Errors in sequence store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Persisted state could not be understood.
    #[error("store corrupted: {reason}")]
    Corrupted {
        /// Description of the corruption.
        reason: String,
    },

    /// I/O error in persistent store.
    #[error("store i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

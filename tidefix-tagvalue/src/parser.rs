/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message parser.
//!
//! The parser turns one framed message into either a typed [`Message`] or a
//! [`ParseFailure`] that tells the session how to react:
//! - garbled input is dropped, since no sequence number can be trusted;
//! - an unknown or unsupported MsgType is rejected by sequence number;
//! - any other problem is an invalid message, rejected with a reason.

use crate::decoder::Decoder;
use crate::header::MessageHeader;
use crate::message::Message;
use thiserror::Error;
use tidefix_core::{DecodeError, MsgType, SeqNum, SessionRejectReason};
use tidefix_dictionary::MessageKind;

/// Outcome of a failed parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// No trustworthy MsgType or MsgSeqNum.
    #[error("garbled message: {text}")]
    Garbled {
        /// Description of the problem.
        text: String,
    },

    /// MsgType is not a FIX message type.
    #[error("invalid MsgType {msg_type} (seq {seq})")]
    InvalidMsgType {
        /// The offending MsgType.
        msg_type: MsgType,
        /// MsgSeqNum of the message.
        seq: SeqNum,
    },

    /// MsgType is a FIX message type without a schema here.
    #[error("unsupported MsgType {msg_type} (seq {seq})")]
    UnsupportedMsgType {
        /// The unsupported MsgType.
        msg_type: MsgType,
        /// MsgSeqNum of the message.
        seq: SeqNum,
    },

    /// The message was identified but is not valid.
    #[error("invalid message {msg_type} (seq {seq}): {error}")]
    InvalidMessage {
        /// MsgType of the message.
        msg_type: MsgType,
        /// MsgSeqNum of the message.
        seq: SeqNum,
        /// What was wrong with it.
        error: DecodeError,
    },
}

impl ParseFailure {
    /// Returns the SessionRejectReason for an invalid message.
    #[must_use]
    pub fn reject_reason(&self) -> Option<SessionRejectReason> {
        match self {
            Self::InvalidMessage { error, .. } => Some(error.reject_reason()),
            Self::InvalidMsgType { .. } => Some(SessionRejectReason::InvalidMsgType),
            Self::Garbled { .. } | Self::UnsupportedMsgType { .. } => None,
        }
    }

    /// Returns the MsgSeqNum, when one could be read.
    #[must_use]
    pub const fn seq(&self) -> Option<SeqNum> {
        match self {
            Self::InvalidMsgType { seq, .. }
            | Self::UnsupportedMsgType { seq, .. }
            | Self::InvalidMessage { seq, .. } => Some(*seq),
            Self::Garbled { .. } => None,
        }
    }
}

/// Receives the outcome of [`Parser::parse`].
pub trait ParserCallback {
    /// A valid message.
    fn message(&mut self, message: Message);

    /// A FIX message type with no schema in this profile.
    fn unsupported_msg_type(&mut self, msg_type: MsgType, seq: SeqNum);

    /// Not a FIX message type at all.
    fn invalid_msg_type(&mut self, msg_type: MsgType, seq: SeqNum);

    /// An identified but invalid message.
    fn invalid_message(&mut self, seq: SeqNum, msg_type: MsgType, error: DecodeError);

    /// Input without a trustworthy MsgType or MsgSeqNum.
    fn garbled_message(&mut self, text: String);
}

/// Parses framed FIX messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser;

impl Parser {
    /// Creates a parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parses one complete message.
    ///
    /// # Arguments
    /// * `bytes` - A single framed message, from `8=` through the CheckSum delimiter
    ///
    /// # Errors
    /// A [`ParseFailure`] describing how the session should react.
    pub fn decode(&self, bytes: &[u8]) -> Result<Message, ParseFailure> {
        let mut decoder = Decoder::new(bytes);
        let mut header = MessageHeader::parse_head(&mut decoder).map_err(garbled)?;
        let msg_type = header.msg_type();

        let standard = header.parse_fields(&mut decoder);
        let Some(seq) = header.msg_seq_num() else {
            return Err(match standard {
                Err(error) => garbled(error),
                Ok(()) => ParseFailure::Garbled {
                    text: "MsgSeqNum(34): is missing".to_string(),
                },
            });
        };
        let invalid = |error: DecodeError| {
            if error.is_garbled() {
                garbled(error)
            } else {
                ParseFailure::InvalidMessage {
                    msg_type: msg_type.clone(),
                    seq,
                    error,
                }
            }
        };
        standard.map_err(invalid)?;

        if !msg_type.is_known() {
            return Err(ParseFailure::InvalidMsgType {
                msg_type: msg_type.clone(),
                seq,
            });
        }
        let Some(kind) = MessageKind::from_msg_type(&msg_type) else {
            return Err(ParseFailure::UnsupportedMsgType {
                msg_type: msg_type.clone(),
                seq,
            });
        };

        Message::parse_body(header, kind, &mut decoder).map_err(invalid)
    }

    /// Parses one complete message and reports the outcome to `callback`.
    pub fn parse(&self, bytes: &[u8], callback: &mut impl ParserCallback) {
        match self.decode(bytes) {
            Ok(message) => callback.message(message),
            Err(ParseFailure::Garbled { text }) => callback.garbled_message(text),
            Err(ParseFailure::InvalidMsgType { msg_type, seq }) => {
                callback.invalid_msg_type(msg_type, seq);
            }
            Err(ParseFailure::UnsupportedMsgType { msg_type, seq }) => {
                callback.unsupported_msg_type(msg_type, seq);
            }
            Err(ParseFailure::InvalidMessage {
                msg_type,
                seq,
                error,
            }) => callback.invalid_message(seq, msg_type, error),
        }
    }
}

fn garbled(error: DecodeError) -> ParseFailure {
    ParseFailure::Garbled {
        text: error.to_string(),
    }
}

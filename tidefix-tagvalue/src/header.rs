/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message head and standard header.
//!
//! The head (BeginString, BodyLength, MsgType) frames the message and is
//! verified together with the CheckSum before anything else is read. The
//! standard header follows MsgType and is parsed generically until the first
//! tag that does not belong to it.

use crate::checksum::{calculate_checksum, parse_checksum};
use crate::decoder::{Decoder, SOH};
use crate::encoder::Encoder;
use crate::message::{parse_fields, write_fields};
use std::time::Duration;
use tidefix_core::{DecodeError, FieldContainer, FieldValue, MsgType, SeqNum, Timestamp};
use tidefix_dictionary::schema::{HEAD_SCHEMA, HEADER_SCHEMA};
use tidefix_dictionary::tags::*;

/// Maximum distance between SendingTime and the local clock.
pub const SENDING_TIME_ACCURACY: Duration = Duration::from_secs(120);

/// Head and standard header of a FIX message.
#[derive(Debug, Clone)]
pub struct MessageHeader {
    head: FieldContainer,
    fields: FieldContainer,
}

impl MessageHeader {
    /// Creates a header carrying only MsgType.
    #[must_use]
    pub fn new(msg_type: &MsgType) -> Self {
        let mut head = FieldContainer::new(HEAD_SCHEMA);
        if let Some(index) = head.position(MSG_TYPE.number()) {
            head.assign(
                index,
                tidefix_core::Slot::Value(FieldValue::String(msg_type.as_str().to_owned())),
            );
        }
        Self {
            head,
            fields: FieldContainer::new(HEADER_SCHEMA),
        }
    }

    /// Returns the head container (BeginString, BodyLength, MsgType).
    #[inline]
    #[must_use]
    pub const fn head(&self) -> &FieldContainer {
        &self.head
    }

    /// Returns the head container mutably.
    #[inline]
    pub fn head_mut(&mut self) -> &mut FieldContainer {
        &mut self.head
    }

    /// Returns the standard header fields.
    #[inline]
    #[must_use]
    pub const fn fields(&self) -> &FieldContainer {
        &self.fields
    }

    /// Returns the standard header fields mutably.
    #[inline]
    pub fn fields_mut(&mut self) -> &mut FieldContainer {
        &mut self.fields
    }

    /// Returns BeginString, if set.
    #[must_use]
    pub fn begin_string(&self) -> Option<&str> {
        self.head.get_str(BEGIN_STRING).ok()
    }

    /// Returns BodyLength as parsed from the wire.
    #[must_use]
    pub fn body_length(&self) -> Option<i64> {
        self.head.get_int(BODY_LENGTH).ok()
    }

    /// Returns MsgType.
    #[must_use]
    pub fn msg_type(&self) -> MsgType {
        MsgType::from(self.head.get_str(MSG_TYPE).unwrap_or_default())
    }

    /// Returns MsgSeqNum, if set and valid.
    #[must_use]
    pub fn msg_seq_num(&self) -> Option<SeqNum> {
        self.fields.get_seq_num(MSG_SEQ_NUM).ok()
    }

    /// Returns SenderCompID, if set.
    #[must_use]
    pub fn sender_comp_id(&self) -> Option<&str> {
        self.fields.get_str(SENDER_COMP_ID).ok()
    }

    /// Returns TargetCompID, if set.
    #[must_use]
    pub fn target_comp_id(&self) -> Option<&str> {
        self.fields.get_str(TARGET_COMP_ID).ok()
    }

    /// Returns SendingTime, if set.
    #[must_use]
    pub fn sending_time(&self) -> Option<Timestamp> {
        self.fields.get_timestamp(SENDING_TIME).ok()
    }

    /// Returns OrigSendingTime, if set.
    #[must_use]
    pub fn orig_sending_time(&self) -> Option<Timestamp> {
        self.fields.get_timestamp(ORIG_SENDING_TIME).ok()
    }

    /// Returns true if PossDupFlag is `Y`.
    #[must_use]
    pub fn is_poss_dup(&self) -> bool {
        self.fields.flag(POSS_DUP_FLAG)
    }

    /// Returns true iff neither OnBehalfOfCompID nor DeliverToCompID is set.
    #[must_use]
    pub fn is_point_to_point(&self) -> bool {
        !self.fields.has_value(ON_BEHALF_OF_COMP_ID.number())
            && !self.fields.has_value(DELIVER_TO_COMP_ID.number())
    }

    /// Returns true if SendingTime is absent or within two minutes of `now`.
    #[must_use]
    pub fn has_accurate_sending_time(&self, now: Timestamp) -> bool {
        self.sending_time()
            .is_none_or(|sent| sent.abs_diff(now) < SENDING_TIME_ACCURACY)
    }

    /// Returns false only for a possible duplicate whose OrigSendingTime is
    /// later than its SendingTime.
    #[must_use]
    pub fn has_consistent_orig_sending_time(&self) -> bool {
        if !self.is_poss_dup() {
            return true;
        }
        match (self.orig_sending_time(), self.sending_time()) {
            (Some(orig), Some(sent)) => orig <= sent,
            _ => true,
        }
    }

    /// Parses the head and the standard header.
    ///
    /// # Arguments
    /// * `decoder` - A decoder positioned at the start of a message
    ///
    /// # Errors
    /// Garbled errors for a bad head, BodyLength or CheckSum; field errors for
    /// the standard header.
    pub fn parse(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let mut header = Self::parse_head(decoder)?;
        header.parse_fields(decoder)?;
        Ok(header)
    }

    /// Reads BeginString, BodyLength and MsgType, verifies the CheckSum and
    /// limits the decoder to the bytes before it.
    pub(crate) fn parse_head(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let mut head = FieldContainer::new(HEAD_SCHEMA);

        let begin_string = read_head_field(decoder, 8, "BeginString")?;
        let body_length = read_head_field(decoder, 9, "BodyLength")?;
        let body_length: usize = parse_body_length(body_length).ok_or(
            DecodeError::InvalidHeadField {
                tag: 9,
                name: "BodyLength",
                reason: "is not a non-negative integer",
            },
        )?;

        let checksum_pos = decoder
            .offset()
            .checked_add(body_length)
            .ok_or(DecodeError::InvalidBodyLength)?;
        verify_checksum(decoder.input(), checksum_pos)?;
        decoder.set_limit(checksum_pos);

        let msg_type = read_head_field(decoder, 35, "MsgType")?;

        let begin_string = std::str::from_utf8(begin_string).map_err(|_| {
            DecodeError::InvalidHeadField {
                tag: 8,
                name: "BeginString",
                reason: "is not valid text",
            }
        })?;
        let msg_type = std::str::from_utf8(msg_type).map_err(|_| DecodeError::InvalidHeadField {
            tag: 35,
            name: "MsgType",
            reason: "is not valid text",
        })?;

        head.set(BEGIN_STRING, begin_string)
            .and_then(|head| head.set(BODY_LENGTH, body_length as u64))
            .and_then(|head| head.set(MSG_TYPE, msg_type))
            .map_err(|_| DecodeError::MissingHeadField {
                tag: 8,
                name: "BeginString",
            })?;

        Ok(Self {
            head,
            fields: FieldContainer::new(HEADER_SCHEMA),
        })
    }

    /// Parses standard header fields until the first non-header tag.
    pub(crate) fn parse_fields(&mut self, decoder: &mut Decoder<'_>) -> Result<(), DecodeError> {
        parse_fields(&mut self.fields, decoder)
    }

    /// Writes MsgType and the standard header in schema order.
    pub fn format(&self, encoder: &mut Encoder) {
        encoder.put_str(MSG_TYPE.number(), self.msg_type().as_str());
        write_fields(&self.fields, encoder);
    }

    /// Checks the required and conditionally required header fields.
    ///
    /// # Errors
    /// `MissingRequiredField` naming the first missing tag.
    pub fn validate(&self) -> Result<(), DecodeError> {
        self.fields.validate()
    }
}

/// BodyLength is derived on every format, so it takes no part in equality.
impl PartialEq for MessageHeader {
    fn eq(&self, other: &Self) -> bool {
        self.begin_string() == other.begin_string()
            && self.msg_type() == other.msg_type()
            && self.fields == other.fields
    }
}

fn read_head_field<'a>(
    decoder: &mut Decoder<'a>,
    tag: u32,
    name: &'static str,
) -> Result<&'a [u8], DecodeError> {
    let field = match decoder.next_field() {
        Ok(Some(field)) if field.tag == tag => field,
        _ => return Err(DecodeError::MissingHeadField { tag, name }),
    };
    if field.is_empty() {
        return Err(DecodeError::InvalidHeadField {
            tag,
            name,
            reason: "is empty",
        });
    }
    Ok(field.value)
}

fn parse_body_length(raw: &[u8]) -> Option<usize> {
    if !raw.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(raw).ok()?.parse().ok()
}

/// Verifies that a well-formed CheckSum field starts at `checksum_pos` and
/// matches the bytes before it.
fn verify_checksum(input: &[u8], checksum_pos: usize) -> Result<(), DecodeError> {
    let trailer = input
        .get(checksum_pos..)
        .filter(|trailer| trailer.starts_with(b"10="))
        .ok_or(DecodeError::InvalidBodyLength)?;
    let value = &trailer[3..];
    let end = memchr::memchr(SOH, value).ok_or(DecodeError::InvalidBodyLength)?;

    let declared = parse_checksum(&value[..end]).ok_or_else(|| DecodeError::InvalidCheckSum {
        reason: format!(
            "'{}' is not three digits",
            String::from_utf8_lossy(&value[..end])
        ),
    })?;
    let calculated = calculate_checksum(&input[..checksum_pos]);
    if declared != calculated {
        return Err(DecodeError::InvalidCheckSum {
            reason: format!("expected {calculated:03}, found {declared:03}"),
        });
    }
    Ok(())
}

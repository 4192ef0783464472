/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Typed FIX messages and the generic container parse.
//!
//! A [`Message`] is a [`MessageHeader`], a [`MessageKind`] and a body
//! [`FieldContainer`] built from the kind's schema. Parsing reads fields in
//! schema order until the first tag the container does not declare; the
//! caller then classifies whatever is left before the CheckSum.

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::header::MessageHeader;
use bytes::BytesMut;
use tidefix_core::codec;
use tidefix_core::{
    DecodeError, EncodeError, FieldContainer, FieldValue, GroupSpec, MsgType, SchemaEntry,
    SeqNum, Slot, Tag,
};
use tidefix_dictionary::MessageKind;
use tidefix_dictionary::tags;

/// A FIX message of one of the supported kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    header: MessageHeader,
    kind: MessageKind,
    body: FieldContainer,
}

impl Message {
    /// Creates an empty message of the given kind.
    #[must_use]
    pub fn new(kind: MessageKind) -> Self {
        Self {
            header: MessageHeader::new(&kind.msg_type()),
            kind,
            body: FieldContainer::new(kind.body_schema()),
        }
    }

    /// Assembles a message from parsed parts.
    pub(crate) fn from_parts(
        header: MessageHeader,
        kind: MessageKind,
        body: FieldContainer,
    ) -> Self {
        Self { header, kind, body }
    }

    /// Returns the message kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Returns the MsgType.
    #[must_use]
    pub fn msg_type(&self) -> MsgType {
        self.kind.msg_type()
    }

    /// Returns the header.
    #[inline]
    #[must_use]
    pub const fn header(&self) -> &MessageHeader {
        &self.header
    }

    /// Returns the header mutably.
    #[inline]
    pub fn header_mut(&mut self) -> &mut MessageHeader {
        &mut self.header
    }

    /// Returns the body.
    #[inline]
    #[must_use]
    pub const fn body(&self) -> &FieldContainer {
        &self.body
    }

    /// Returns the body mutably.
    #[inline]
    pub fn body_mut(&mut self) -> &mut FieldContainer {
        &mut self.body
    }

    /// Sets a body field.
    ///
    /// # Errors
    /// `EncodeError::UnknownField` if the body schema does not declare `tag`.
    pub fn set(&mut self, tag: Tag, value: impl Into<FieldValue>) -> Result<&mut Self, EncodeError> {
        self.body.set(tag, value)?;
        Ok(self)
    }

    /// Returns MsgSeqNum, if set.
    #[must_use]
    pub fn seq_num(&self) -> Option<SeqNum> {
        self.header.msg_seq_num()
    }

    /// Returns true if PossDupFlag is `Y`.
    #[must_use]
    pub fn is_poss_dup(&self) -> bool {
        self.header.is_poss_dup()
    }

    /// Parses the body of a message whose header has already been read.
    ///
    /// # Errors
    /// Any field error, a leftover tag before the CheckSum, or a missing
    /// required field in the header or body.
    pub(crate) fn parse_body(
        header: MessageHeader,
        kind: MessageKind,
        decoder: &mut Decoder<'_>,
    ) -> Result<Self, DecodeError> {
        let mut body = FieldContainer::new(kind.body_schema());
        parse_fields(&mut body, decoder)?;
        if let Some(tag) = decoder.peek_tag()? {
            return Err(classify_leftover(tag));
        }
        header.validate()?;
        body.validate()?;
        Ok(Self::from_parts(header, kind, body))
    }

    /// Formats the message, recomputing BodyLength and CheckSum.
    ///
    /// # Errors
    /// `EncodeError::MissingHeadField` if BeginString is not set.
    pub fn format(&self) -> Result<BytesMut, EncodeError> {
        let begin_string = self
            .header
            .begin_string()
            .ok_or(EncodeError::MissingHeadField {
                tag: tags::BEGIN_STRING.number(),
            })?;
        let mut encoder = Encoder::new();
        self.header.format(&mut encoder);
        write_fields(&self.body, &mut encoder);
        Ok(encoder.finish(begin_string))
    }
}

/// Classifies the first tag left over after the body parse stopped.
fn classify_leftover(tag: u32) -> DecodeError {
    if tags::is_header_or_trailer(tag) {
        DecodeError::OutOfOrderTag { tag }
    } else if tags::lookup(tag).is_some() {
        DecodeError::TagNotDefinedForMessage { tag }
    } else {
        DecodeError::UndefinedTag { tag }
    }
}

/// Reads fields into `container` until the next tag is not in its schema.
///
/// # Errors
/// - `DuplicateTag` if a tag is assigned twice
/// - any codec error for the field value
/// - group errors for repeating groups
pub fn parse_fields(
    container: &mut FieldContainer,
    decoder: &mut Decoder<'_>,
) -> Result<(), DecodeError> {
    while let Some(tag) = decoder.peek_tag()? {
        let Some(index) = container.position(tag) else {
            break;
        };
        if container.slot(index).is_some() {
            return Err(DecodeError::DuplicateTag { tag });
        }
        read_slot(container, index, decoder)?;
    }
    Ok(())
}

/// Reads the next field into the slot at `index`, descending into groups.
fn read_slot(
    container: &mut FieldContainer,
    index: usize,
    decoder: &mut Decoder<'_>,
) -> Result<(), DecodeError> {
    let Some(&entry) = container.schema().get(index) else {
        return Ok(());
    };
    let Some(field) = decoder.next_field()? else {
        return Ok(());
    };
    let value = codec::decode(entry.tag(), field.value)?;
    let slot = match entry {
        SchemaEntry::Field { .. } => Slot::Value(value),
        SchemaEntry::Group(spec) => {
            let declared = value.as_i64().unwrap_or_default();
            Slot::Group(parse_group(&spec, declared, decoder)?)
        }
    };
    container.assign(index, slot);
    Ok(())
}

/// Parses the entries of a repeating group after its count field.
fn parse_group(
    spec: &GroupSpec,
    declared: i64,
    decoder: &mut Decoder<'_>,
) -> Result<Vec<FieldContainer>, DecodeError> {
    let mut entries = Vec::new();
    let Some(delimiter) = spec.entries.first().map(|entry| entry.tag().number()) else {
        return Ok(entries);
    };
    let in_group = |tag: u32| spec.entries.iter().any(|entry| entry.tag().number() == tag);

    loop {
        match decoder.peek_tag()? {
            Some(tag) if tag == delimiter => {}
            Some(tag) if entries.is_empty() && declared > 0 && in_group(tag) => {
                return Err(DecodeError::GroupFieldsOutOfOrder { tag });
            }
            _ => break,
        }

        let mut entry = FieldContainer::new(spec.entries);
        let mut last: Option<usize> = None;
        while let Some(tag) = decoder.peek_tag()? {
            let Some(index) = entry.position(tag) else {
                break;
            };
            if last.is_some() && tag == delimiter {
                break;
            }
            if last.is_some_and(|last| index <= last) {
                return Err(DecodeError::GroupFieldsOutOfOrder { tag });
            }
            read_slot(&mut entry, index, decoder)?;
            last = Some(index);
        }
        entries.push(entry);
    }

    if i64::try_from(entries.len()).ok() != Some(declared) {
        return Err(DecodeError::GroupCountMismatch {
            count_tag: spec.count.number(),
            expected: u32::try_from(declared).unwrap_or(u32::MAX),
            actual: u32::try_from(entries.len()).unwrap_or(u32::MAX),
        });
    }
    Ok(entries)
}

/// Writes every assigned entry of `container` in schema order.
///
/// Group counts are derived from the number of entries.
pub fn write_fields(container: &FieldContainer, encoder: &mut Encoder) {
    for (entry, slot) in container.iter() {
        let tag = entry.tag().number();
        match slot {
            Slot::Value(value) => encoder.put_value(tag, value),
            Slot::Group(entries) => {
                encoder.put_int(tag, i64::try_from(entries.len()).unwrap_or(i64::MAX));
                for group_entry in entries {
                    write_fields(group_entry, encoder);
                }
            }
        }
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema-driven field containers.
//!
//! Every message section (head, standard header, body, repeating group entry)
//! is a [`FieldContainer`] configured with a static schema. The schema fixes
//! which tags may appear, their wire order, and whether each one is required,
//! optional, or required only when a predicate over sibling values holds.

use crate::error::{DecodeError, EncodeError};
use crate::field::{FieldValue, FixEnum, Tag};
use crate::types::{SeqNum, Timestamp};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use smallvec::SmallVec;
use std::fmt;

/// Requirement predicate, evaluated against the container being validated.
pub type Predicate = fn(&FieldContainer) -> bool;

/// Presence requirement of a schema entry.
#[derive(Debug, Clone, Copy)]
pub enum Required {
    /// Always required.
    Yes,
    /// Never required.
    No,
    /// Required when the predicate holds for the enclosing container.
    When(Predicate),
}

impl Required {
    /// Evaluates the requirement for `container`.
    #[inline]
    #[must_use]
    pub fn holds(self, container: &FieldContainer) -> bool {
        match self {
            Self::Yes => true,
            Self::No => false,
            Self::When(predicate) => predicate(container),
        }
    }
}

/// A repeating group: its NumInGroup tag and the schema of each entry.
///
/// The first entry of `entries` is the delimiter field that opens every
/// group instance.
#[derive(Debug, Clone, Copy)]
pub struct GroupSpec {
    /// NumInGroup tag carrying the entry count.
    pub count: Tag,
    /// Presence requirement of the group.
    pub required: Required,
    /// Schema of each entry.
    pub entries: &'static [SchemaEntry],
}

/// One entry of a container schema.
#[derive(Debug, Clone, Copy)]
pub enum SchemaEntry {
    /// A single field.
    Field {
        /// Field definition.
        tag: Tag,
        /// Presence requirement.
        required: Required,
    },
    /// A repeating group.
    Group(GroupSpec),
}

impl SchemaEntry {
    /// A field that must always be present.
    #[must_use]
    pub const fn required(tag: Tag) -> Self {
        Self::Field {
            tag,
            required: Required::Yes,
        }
    }

    /// A field that may be absent.
    #[must_use]
    pub const fn optional(tag: Tag) -> Self {
        Self::Field {
            tag,
            required: Required::No,
        }
    }

    /// A field required only when `predicate` holds.
    #[must_use]
    pub const fn conditional(tag: Tag, predicate: Predicate) -> Self {
        Self::Field {
            tag,
            required: Required::When(predicate),
        }
    }

    /// A repeating group.
    #[must_use]
    pub const fn group(count: Tag, required: Required, entries: &'static [SchemaEntry]) -> Self {
        Self::Group(GroupSpec {
            count,
            required,
            entries,
        })
    }

    /// Returns the tag of the field, or the count tag of the group.
    #[must_use]
    pub const fn tag(&self) -> Tag {
        match self {
            Self::Field { tag, .. } => *tag,
            Self::Group(group) => group.count,
        }
    }

    /// Returns the presence requirement.
    #[must_use]
    pub const fn requirement(&self) -> Required {
        match self {
            Self::Field { required, .. } => *required,
            Self::Group(group) => group.required,
        }
    }
}

/// Value held for one schema entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// A field value.
    Value(FieldValue),
    /// The entries of a repeating group.
    Group(Vec<FieldContainer>),
}

/// Ordered, typed field set backed by a static schema.
///
/// Insertion order never matters: fields are always iterated and encoded in
/// schema order.
#[derive(Clone)]
pub struct FieldContainer {
    schema: &'static [SchemaEntry],
    slots: SmallVec<[Option<Slot>; 12]>,
}

impl FieldContainer {
    /// Creates an empty container for `schema`.
    #[must_use]
    pub fn new(schema: &'static [SchemaEntry]) -> Self {
        Self {
            schema,
            slots: SmallVec::from_elem(None, schema.len()),
        }
    }

    /// Returns the schema.
    #[inline]
    #[must_use]
    pub const fn schema(&self) -> &'static [SchemaEntry] {
        self.schema
    }

    /// Returns the schema index of `tag`.
    #[must_use]
    pub fn position(&self, tag: u32) -> Option<usize> {
        self.schema.iter().position(|entry| entry.tag().number() == tag)
    }

    /// Returns true if the schema declares `tag`.
    #[inline]
    #[must_use]
    pub fn contains(&self, tag: u32) -> bool {
        self.position(tag).is_some()
    }

    /// Returns the slot at a schema index.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Stores a decoded slot at a schema index. Out-of-range indices are ignored.
    pub fn assign(&mut self, index: usize, slot: Slot) {
        if let Some(target) = self.slots.get_mut(index) {
            *target = Some(slot);
        }
    }

    /// Returns true if `tag` holds a value or group.
    #[must_use]
    pub fn has_value(&self, tag: u32) -> bool {
        self.position(tag).and_then(|index| self.slot(index)).is_some()
    }

    /// Returns the value of a plain field.
    #[must_use]
    pub fn get(&self, tag: u32) -> Option<&FieldValue> {
        match self.position(tag).and_then(|index| self.slot(index)) {
            Some(Slot::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Sets a field value.
    ///
    /// # Arguments
    /// * `tag` - The field to set
    /// * `value` - The new value
    ///
    /// # Errors
    /// - `EncodeError::UnknownField` if the schema does not declare `tag`
    /// - `EncodeError::GroupCount` if `tag` is a repeating group count
    pub fn set(&mut self, tag: Tag, value: impl Into<FieldValue>) -> Result<&mut Self, EncodeError> {
        let number = tag.number();
        let index = self
            .position(number)
            .ok_or(EncodeError::UnknownField { tag: number })?;
        if matches!(self.schema[index], SchemaEntry::Group(_)) {
            return Err(EncodeError::GroupCount { tag: number });
        }
        self.slots[index] = Some(Slot::Value(value.into()));
        Ok(self)
    }

    /// Clears a field or group, returning what it held.
    pub fn remove(&mut self, tag: u32) -> Option<Slot> {
        let index = self.position(tag)?;
        self.slots[index].take()
    }

    /// Returns the entries of a repeating group; empty when unset.
    #[must_use]
    pub fn group(&self, count: Tag) -> &[FieldContainer] {
        match self.position(count.number()).and_then(|index| self.slot(index)) {
            Some(Slot::Group(entries)) => entries,
            _ => &[],
        }
    }

    /// Appends an empty entry to a repeating group and returns it.
    ///
    /// # Errors
    /// - `EncodeError::UnknownField` if the schema does not declare `count`
    /// - `EncodeError::NotAGroup` if `count` is a plain field
    pub fn add_group_entry(&mut self, count: Tag) -> Result<&mut FieldContainer, EncodeError> {
        let number = count.number();
        let index = self
            .position(number)
            .ok_or(EncodeError::UnknownField { tag: number })?;
        let SchemaEntry::Group(spec) = self.schema[index] else {
            return Err(EncodeError::NotAGroup { tag: number });
        };
        let slot = &mut self.slots[index];
        if let Some(Slot::Group(entries)) = slot {
            entries.push(FieldContainer::new(spec.entries));
        } else {
            *slot = Some(Slot::Group(vec![FieldContainer::new(spec.entries)]));
        }
        match slot {
            Some(Slot::Group(entries)) => entries
                .last_mut()
                .ok_or(EncodeError::NotAGroup { tag: number }),
            _ => Err(EncodeError::NotAGroup { tag: number }),
        }
    }

    fn require(&self, tag: Tag) -> Result<&FieldValue, DecodeError> {
        self.get(tag.number())
            .ok_or(DecodeError::MissingRequiredField { tag: tag.number() })
    }

    /// Returns a string field.
    ///
    /// # Errors
    /// `MissingRequiredField` when unset, `IncorrectDataFormat` when not a string.
    pub fn get_str(&self, tag: Tag) -> Result<&str, DecodeError> {
        self.require(tag)?
            .as_str()
            .ok_or(DecodeError::IncorrectDataFormat { tag: tag.number() })
    }

    /// Returns an integer field.
    ///
    /// # Errors
    /// `MissingRequiredField` when unset, `IncorrectDataFormat` when not an integer.
    pub fn get_int(&self, tag: Tag) -> Result<i64, DecodeError> {
        self.require(tag)?
            .as_i64()
            .ok_or(DecodeError::IncorrectDataFormat { tag: tag.number() })
    }

    /// Returns a sequence number field.
    ///
    /// # Errors
    /// `MissingRequiredField` when unset, `IncorrectDataFormat` when negative.
    pub fn get_seq_num(&self, tag: Tag) -> Result<SeqNum, DecodeError> {
        let value = self.get_int(tag)?;
        u64::try_from(value)
            .map(SeqNum::new)
            .map_err(|_| DecodeError::IncorrectDataFormat { tag: tag.number() })
    }

    /// Returns a decimal field.
    ///
    /// # Errors
    /// `MissingRequiredField` when unset, `IncorrectDataFormat` when not a decimal.
    pub fn get_decimal(&self, tag: Tag) -> Result<Decimal, DecodeError> {
        self.require(tag)?
            .as_decimal()
            .ok_or(DecodeError::IncorrectDataFormat { tag: tag.number() })
    }

    /// Returns a boolean field.
    ///
    /// # Errors
    /// `MissingRequiredField` when unset, `IncorrectDataFormat` when not a boolean.
    pub fn get_bool(&self, tag: Tag) -> Result<bool, DecodeError> {
        self.require(tag)?
            .as_bool()
            .ok_or(DecodeError::IncorrectDataFormat { tag: tag.number() })
    }

    /// Returns a char field.
    ///
    /// # Errors
    /// `MissingRequiredField` when unset, `IncorrectDataFormat` when not a char.
    pub fn get_char(&self, tag: Tag) -> Result<char, DecodeError> {
        self.require(tag)?
            .as_char()
            .ok_or(DecodeError::IncorrectDataFormat { tag: tag.number() })
    }

    /// Returns a timestamp field.
    ///
    /// # Errors
    /// `MissingRequiredField` when unset, `IncorrectDataFormat` when not a timestamp.
    pub fn get_timestamp(&self, tag: Tag) -> Result<Timestamp, DecodeError> {
        self.require(tag)?
            .as_timestamp()
            .ok_or(DecodeError::IncorrectDataFormat { tag: tag.number() })
    }

    /// Returns a date field.
    ///
    /// # Errors
    /// `MissingRequiredField` when unset, `IncorrectDataFormat` when not a date.
    pub fn get_date(&self, tag: Tag) -> Result<NaiveDate, DecodeError> {
        self.require(tag)?
            .as_date()
            .ok_or(DecodeError::IncorrectDataFormat { tag: tag.number() })
    }

    /// Returns an enumerated field.
    ///
    /// # Errors
    /// `MissingRequiredField` when unset, `InvalidValueForTag` for an unknown code.
    pub fn get_enum<E: FixEnum>(&self, tag: Tag) -> Result<E, DecodeError> {
        let code = self.get_str(tag)?;
        E::from_code(code).ok_or(DecodeError::InvalidValueForTag { tag: tag.number() })
    }

    /// Returns true iff a boolean field is set to `Y`.
    #[must_use]
    pub fn flag(&self, tag: Tag) -> bool {
        matches!(self.get(tag.number()), Some(FieldValue::Bool(true)))
    }

    /// Checks required and conditionally required entries, recursing into
    /// repeating groups.
    ///
    /// # Errors
    /// `MissingRequiredField` naming the first missing tag in schema order.
    pub fn validate(&self) -> Result<(), DecodeError> {
        for (entry, slot) in self.schema.iter().zip(self.slots.iter()) {
            match slot {
                None if entry.requirement().holds(self) => {
                    return Err(DecodeError::MissingRequiredField {
                        tag: entry.tag().number(),
                    });
                }
                Some(Slot::Group(entries)) => {
                    for group_entry in entries {
                        group_entry.validate()?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Iterates over assigned entries in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&SchemaEntry, &Slot)> + '_ {
        self.schema
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(entry, slot)| slot.as_ref().map(|slot| (entry, slot)))
    }

    /// Returns the number of assigned entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns true if nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl PartialEq for FieldContainer {
    fn eq(&self, other: &Self) -> bool {
        self.schema.len() == other.schema.len() && self.slots == other.slots
    }
}

impl fmt::Debug for FieldContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(entry, slot)| (entry.tag().number(), slot)))
            .finish()
    }
}

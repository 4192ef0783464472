/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Field definitions for FIX protocol messages.
//!
//! This module provides:
//! - [`Tag`]: a process-wide field definition (number, name, value kind)
//! - [`FieldKind`]: the value kind that selects a field's codec
//! - [`FieldRef`]: zero-copy reference to a field within a message buffer
//! - [`FieldValue`]: a decoded field value
//! - [`FixEnum`]: closed sets of enumerated codes, usually declared through
//!   the [`fix_enum!`](crate::fix_enum) macro

use crate::error::DecodeError;
use crate::types::Timestamp;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Value kind of a field, selecting how its wire text is encoded and decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    String,
    /// Signed integer.
    Int,
    /// Decimal number (prices, quantities).
    Float,
    /// `Y` or `N`.
    Boolean,
    /// Single ASCII character.
    Char,
    /// `YYYYMMDD-HH:MM:SS[.sss]` in UTC.
    UtcTimestamp,
    /// `YYYYMMDD`.
    LocalMktDate,
    /// `YYYYMM`.
    MonthYear,
    /// Number of entries of a repeating group.
    NumInGroup,
    /// Closed set of codes.
    Enum(&'static [&'static str]),
}

/// A FIX field definition.
///
/// Tags are declared once as constants and never change; two tags are equal
/// when their numbers are equal.
#[derive(Debug, Clone, Copy)]
pub struct Tag {
    number: u32,
    name: &'static str,
    kind: FieldKind,
}

impl Tag {
    /// Creates a new field definition.
    ///
    /// # Arguments
    /// * `number` - The tag number
    /// * `name` - The FIX field name
    /// * `kind` - The value kind used by the codec
    #[inline]
    #[must_use]
    pub const fn new(number: u32, name: &'static str, kind: FieldKind) -> Self {
        Self { number, name, kind }
    }

    /// Returns the raw tag number.
    #[inline]
    #[must_use]
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns the FIX field name.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Returns the value kind.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        self.kind
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}

impl From<Tag> for u32 {
    fn from(tag: Tag) -> Self {
        tag.number
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.number)
    }
}

/// Zero-copy reference to a field within a FIX message buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef<'a> {
    /// The field tag number.
    pub tag: u32,
    /// Reference to the field value bytes (without delimiters).
    pub value: &'a [u8],
}

impl<'a> FieldRef<'a> {
    /// Creates a new field reference.
    ///
    /// # Arguments
    /// * `tag` - The field tag number
    /// * `value` - Reference to the value bytes
    #[inline]
    #[must_use]
    pub const fn new(tag: u32, value: &'a [u8]) -> Self {
        Self { tag, value }
    }

    /// Returns the value as a string slice.
    ///
    /// # Errors
    /// Returns `DecodeError::IncorrectDataFormat` if the value is not valid UTF-8.
    pub fn as_str(&self) -> Result<&'a str, DecodeError> {
        std::str::from_utf8(self.value).map_err(|_| DecodeError::IncorrectDataFormat { tag: self.tag })
    }

    /// Returns true if the value is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// A decoded FIX field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// String value, also used for enumerated codes.
    String(String),
    /// Integer value.
    Int(i64),
    /// Decimal value.
    Decimal(Decimal),
    /// Boolean value (Y/N).
    Bool(bool),
    /// Single character value.
    Char(char),
    /// UTC timestamp.
    Timestamp(Timestamp),
    /// Local market date.
    Date(NaiveDate),
}

impl FieldValue {
    /// Returns the value as a string, if it is a String variant.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is an Int variant.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a Decimal, if it is a Decimal variant.
    #[must_use]
    pub const fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a bool, if it is a Bool variant.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a char, if it is a Char variant.
    #[must_use]
    pub const fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a timestamp, if it is a Timestamp variant.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a date, if it is a Date variant.
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Bool(v) => f.write_str(if *v { "Y" } else { "N" }),
            Self::Char(c) => write!(f, "{c}"),
            Self::Timestamp(ts) => f.write_str(&ts.format_fix()),
            Self::Date(d) => write!(f, "{}", d.format("%Y%m%d")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<char> for FieldValue {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// A closed set of enumerated codes carried by a field.
pub trait FixEnum: Sized + Copy {
    /// Every valid wire code, in declaration order.
    const CODES: &'static [&'static str];

    /// Looks up the variant for a wire code.
    fn from_code(code: &str) -> Option<Self>;

    /// Returns the wire code of this variant.
    fn code(self) -> &'static str;
}

/// Declares an enumerated field value type.
///
/// The generated enum implements [`FixEnum`], `Display` (the wire code) and
/// converts into a [`FieldValue`].
///
/// ```rust,ignore
/// fix_enum! {
///     /// HandlInst (tag 21).
///     pub enum HandlInst {
///         /// Automated execution, private.
///         AutomatedPrivate = "1",
///         /// Manual order.
///         Manual = "3",
///     }
/// }
/// ```
#[macro_export]
macro_rules! fix_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $crate::field::FixEnum for $name {
            const CODES: &'static [&'static str] = &[$($code),+];

            fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::field::FixEnum::code(*self))
            }
        }

        impl ::std::convert::From<$name> for $crate::field::FieldValue {
            fn from(value: $name) -> Self {
                $crate::field::FieldValue::String(
                    $crate::field::FixEnum::code(value).to_owned(),
                )
            }
        }
    };
}

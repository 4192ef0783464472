/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Typed encode/decode of single field values.
//!
//! Decoding is strict: numbers must be in canonical FIX form, booleans are
//! `Y`/`N` only, timestamps follow `YYYYMMDD-HH:MM:SS` with an optional
//! `.sss` suffix, and enumerated codes must belong to their closed set.

use crate::error::DecodeError;
use crate::field::{FieldKind, FieldValue, Tag};
use crate::types::Timestamp;
use bytes::{BufMut, BytesMut};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Decodes the wire text of a field into a typed value.
///
/// # Arguments
/// * `tag` - The field definition selecting the value kind
/// * `raw` - The value bytes, without tag or delimiter
///
/// # Errors
/// - `TagWithoutValue` if `raw` is empty
/// - `InvalidValueForTag` for booleans and enumerated codes outside their set
/// - `IncorrectDataFormat` for anything that does not match the kind's format
pub fn decode(tag: Tag, raw: &[u8]) -> Result<FieldValue, DecodeError> {
    let number = tag.number();
    if raw.is_empty() {
        return Err(DecodeError::TagWithoutValue { tag: number });
    }
    let format_error = || DecodeError::IncorrectDataFormat { tag: number };
    let text = std::str::from_utf8(raw).map_err(|_| format_error())?;

    match tag.kind() {
        FieldKind::String => Ok(FieldValue::String(text.to_owned())),
        FieldKind::Int => parse_int(text).map(FieldValue::Int).ok_or_else(format_error),
        FieldKind::NumInGroup => parse_int(text)
            .filter(|count| *count >= 0)
            .map(FieldValue::Int)
            .ok_or_else(format_error),
        FieldKind::Float => parse_decimal(text)
            .map(FieldValue::Decimal)
            .ok_or_else(format_error),
        FieldKind::Boolean => match raw {
            b"Y" => Ok(FieldValue::Bool(true)),
            b"N" => Ok(FieldValue::Bool(false)),
            _ => Err(DecodeError::InvalidValueForTag { tag: number }),
        },
        FieldKind::Char => match raw {
            [c] if c.is_ascii_graphic() || *c == b' ' => Ok(FieldValue::Char(char::from(*c))),
            _ => Err(format_error()),
        },
        FieldKind::UtcTimestamp => Timestamp::parse_fix(text)
            .map(FieldValue::Timestamp)
            .ok_or_else(format_error),
        FieldKind::LocalMktDate => parse_date(text)
            .map(FieldValue::Date)
            .ok_or_else(format_error),
        FieldKind::MonthYear => {
            if is_month_year(raw) {
                Ok(FieldValue::String(text.to_owned()))
            } else {
                Err(format_error())
            }
        }
        FieldKind::Enum(codes) => {
            if codes.contains(&text) {
                Ok(FieldValue::String(text.to_owned()))
            } else {
                Err(DecodeError::InvalidValueForTag { tag: number })
            }
        }
    }
}

/// Appends the wire text of a value to `out`.
///
/// # Arguments
/// * `value` - The value to encode
/// * `out` - The buffer to append to
pub fn encode(value: &FieldValue, out: &mut BytesMut) {
    match value {
        FieldValue::String(s) => out.put_slice(s.as_bytes()),
        FieldValue::Int(v) => {
            let mut buf = itoa::Buffer::new();
            out.put_slice(buf.format(*v).as_bytes());
        }
        FieldValue::Bool(v) => out.put_u8(if *v { b'Y' } else { b'N' }),
        FieldValue::Char(c) => {
            let mut buf = [0u8; 4];
            out.put_slice(c.encode_utf8(&mut buf).as_bytes());
        }
        FieldValue::Timestamp(ts) => out.put_slice(ts.format_fix().as_bytes()),
        other => out.put_slice(other.to_string().as_bytes()),
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let mut digits = 0usize;
    let mut dots = 0usize;
    for b in unsigned.bytes() {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    Decimal::from_str(text).ok()
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y%m%d").ok()
}

fn is_month_year(raw: &[u8]) -> bool {
    raw.len() == 6
        && raw.iter().all(u8::is_ascii_digit)
        && matches!((raw[4] - b'0') * 10 + (raw[5] - b'0'), 1..=12)
}

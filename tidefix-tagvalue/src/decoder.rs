/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Zero-copy field reader.
//!
//! The decoder walks a message buffer one `tag=value<SOH>` field at a time,
//! returning values as slices of the original buffer. A limit can be set so
//! that reading stops at the CheckSum field once BodyLength is known.

use tidefix_core::error::DecodeError;
use tidefix_core::field::FieldRef;
use memchr::memchr;

/// SOH (Start of Header) delimiter used in FIX messages.
pub const SOH: u8 = 0x01;

/// Equals sign delimiter between tag and value.
pub const EQUALS: u8 = b'=';

/// Zero-copy FIX field reader.
#[derive(Debug)]
pub struct Decoder<'a> {
    /// Input buffer.
    input: &'a [u8],
    /// Current position in the buffer.
    offset: usize,
    /// Reading never goes past this position.
    limit: usize,
    /// Tag of the last field read, used to attribute embedded delimiters.
    last_tag: u32,
}

impl<'a> Decoder<'a> {
    /// Creates a new decoder for the given input buffer.
    ///
    /// # Arguments
    /// * `input` - The FIX message bytes to decode
    #[inline]
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            limit: input.len(),
            last_tag: 0,
        }
    }

    /// Returns the whole input buffer.
    #[inline]
    #[must_use]
    pub const fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Returns the current offset in the buffer.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the current read limit.
    #[inline]
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Restricts reading to `[offset, limit)`. Values past the input are clamped.
    #[inline]
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.min(self.input.len());
    }

    /// Returns the unread bytes before the limit.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.offset..self.limit).unwrap_or_default()
    }

    /// Returns true if everything before the limit has been read.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offset >= self.limit
    }

    /// Returns the tag of the next field without consuming it.
    ///
    /// # Returns
    /// `Ok(None)` when nothing is left before the limit.
    ///
    /// # Errors
    /// - `EmbeddedDelimiter` if the next token has no `=` before its delimiter
    /// - `InvalidTagNumber` if the tag is not a positive decimal number
    /// - `MissingDelimiter` if the field is not terminated before the limit
    pub fn peek_tag(&self) -> Result<Option<u32>, DecodeError> {
        Ok(self.scan()?.map(|(tag, _, _)| tag))
    }

    /// Reads the next field.
    ///
    /// # Returns
    /// `Ok(None)` when nothing is left before the limit.
    ///
    /// # Errors
    /// Same as [`Decoder::peek_tag`].
    pub fn next_field(&mut self) -> Result<Option<FieldRef<'a>>, DecodeError> {
        let Some((tag, value_start, value_end)) = self.scan()? else {
            return Ok(None);
        };
        self.offset = value_end + 1;
        self.last_tag = tag;
        Ok(Some(FieldRef::new(tag, &self.input[value_start..value_end])))
    }

    /// Locates the next field, returning its tag and absolute value range.
    fn scan(&self) -> Result<Option<(u32, usize, usize)>, DecodeError> {
        let remaining = self.remaining();
        if remaining.is_empty() {
            return Ok(None);
        }

        let eq_pos = memchr(EQUALS, remaining);
        let soh_pos = memchr(SOH, remaining);
        let eq_pos = match (eq_pos, soh_pos) {
            (Some(eq), Some(soh)) if soh < eq => {
                return Err(DecodeError::EmbeddedDelimiter { tag: self.last_tag });
            }
            (None, Some(_)) => {
                return Err(DecodeError::EmbeddedDelimiter { tag: self.last_tag });
            }
            (Some(eq), _) => eq,
            (None, None) => {
                return Err(DecodeError::MissingDelimiter {
                    offset: self.offset,
                });
            }
        };

        let tag_bytes = &remaining[..eq_pos];
        let tag = parse_tag(tag_bytes).ok_or_else(|| {
            DecodeError::InvalidTagNumber(String::from_utf8_lossy(tag_bytes).into_owned())
        })?;

        let value_start = eq_pos + 1;
        let value_len = memchr(SOH, &remaining[value_start..]).ok_or(
            DecodeError::MissingDelimiter {
                offset: self.offset,
            },
        )?;

        let start = self.offset + value_start;
        Ok(Some((tag, start, start + value_len)))
    }
}

/// Parses a tag number from ASCII bytes.
///
/// # Returns
/// The parsed tag number, or `None` if it is empty, non-numeric, zero or overflows.
#[inline]
fn parse_tag(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || bytes.len() > 10 {
        return None;
    }

    let mut result: u32 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        result = result.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
    }

    (result > 0).then_some(result)
}

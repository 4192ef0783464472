/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FIX message encoder.
//!
//! Fields are appended from MsgType onwards. [`Encoder::finish`] prefixes
//! BeginString and BodyLength and appends the CheckSum over the assembled
//! bytes.

use crate::checksum::{calculate_checksum, format_checksum};
use bytes::{BufMut, BytesMut};
use tidefix_core::codec;
use tidefix_core::field::FieldValue;

/// SOH (Start of Header) delimiter used in FIX messages.
pub const SOH: u8 = 0x01;

/// FIX message encoder.
#[derive(Debug)]
pub struct Encoder {
    /// Everything between BodyLength and CheckSum.
    body: BytesMut,
}

impl Encoder {
    /// Creates a new encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new encoder with pre-allocated capacity.
    ///
    /// # Arguments
    /// * `capacity` - Initial body buffer capacity in bytes
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            body: BytesMut::with_capacity(capacity),
        }
    }

    /// Appends a field with a string value.
    #[inline]
    pub fn put_str(&mut self, tag: u32, value: &str) {
        self.put_raw(tag, value.as_bytes());
    }

    /// Appends a field with an integer value.
    #[inline]
    pub fn put_int(&mut self, tag: u32, value: i64) {
        let mut buf = itoa::Buffer::new();
        self.put_raw(tag, buf.format(value).as_bytes());
    }

    /// Appends a typed field value through the field codec.
    ///
    /// # Arguments
    /// * `tag` - The field tag number
    /// * `value` - The value to encode
    #[inline]
    pub fn put_value(&mut self, tag: u32, value: &FieldValue) {
        self.put_tag(tag);
        codec::encode(value, &mut self.body);
        self.body.put_u8(SOH);
    }

    /// Appends a field with raw bytes.
    ///
    /// # Arguments
    /// * `tag` - The field tag number
    /// * `value` - The field value bytes
    #[inline]
    pub fn put_raw(&mut self, tag: u32, value: &[u8]) {
        self.put_tag(tag);
        self.body.put_slice(value);
        self.body.put_u8(SOH);
    }

    #[inline]
    fn put_tag(&mut self, tag: u32) {
        let mut buf = itoa::Buffer::new();
        self.body.put_slice(buf.format(tag).as_bytes());
        self.body.put_u8(b'=');
    }

    /// Finalizes the message.
    ///
    /// Prepends BeginString (8) and BodyLength (9), then appends CheckSum (10)
    /// computed over every preceding byte.
    ///
    /// # Arguments
    /// * `begin_string` - The BeginString value, e.g. `FIX.4.2`
    ///
    /// # Returns
    /// The complete FIX message.
    #[must_use]
    pub fn finish(self, begin_string: &str) -> BytesMut {
        let body_len = self.body.len();
        let mut len_buf = itoa::Buffer::new();
        let len_str = len_buf.format(body_len);

        let mut message =
            BytesMut::with_capacity(begin_string.len() + len_str.len() + body_len + 16);
        message.put_slice(b"8=");
        message.put_slice(begin_string.as_bytes());
        message.put_u8(SOH);
        message.put_slice(b"9=");
        message.put_slice(len_str.as_bytes());
        message.put_u8(SOH);
        message.put_slice(&self.body);

        let checksum = format_checksum(calculate_checksum(&message));
        message.put_slice(b"10=");
        message.put_slice(&checksum);
        message.put_u8(SOH);

        message
    }

    /// Returns the current body length.
    #[inline]
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Clears the encoder for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.body.clear();
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::parse_checksum;
    use rust_decimal::Decimal;

    #[test]
    fn test_finish_frames_message() {
        let mut encoder = Encoder::new();
        encoder.put_str(35, "0");
        let message = encoder.finish("FIX.4.2");
        assert_eq!(&message[..], b"8=FIX.4.2\x019=5\x0135=0\x0110=161\x01");
    }

    #[test]
    fn test_checksum_covers_head() {
        let mut encoder = Encoder::new();
        encoder.put_str(35, "A");
        encoder.put_int(34, 1);
        let message = encoder.finish("FIX.4.2");
        let checksum_pos = message.len() - 7;
        assert_eq!(&message[checksum_pos..checksum_pos + 3], b"10=");
        assert_eq!(
            parse_checksum(&message[checksum_pos + 3..checksum_pos + 6]),
            Some(calculate_checksum(&message[..checksum_pos]))
        );
    }

    #[test]
    fn test_put_value() {
        let mut encoder = Encoder::new();
        encoder.put_value(44, &FieldValue::Decimal(Decimal::new(10050, 2)));
        encoder.put_value(43, &FieldValue::Bool(true));
        encoder.put_int(7, -1);
        let message = encoder.finish("FIX.4.2");
        let text = String::from_utf8_lossy(&message);
        assert!(text.contains("\x0144=100.50\x0143=Y\x017=-1\x01"));
    }

    #[test]
    fn test_encoder_clear() {
        let mut encoder = Encoder::default();
        encoder.put_str(35, "0");
        assert_eq!(encoder.body_len(), 5);
        encoder.clear();
        assert_eq!(encoder.body_len(), 0);
    }
}

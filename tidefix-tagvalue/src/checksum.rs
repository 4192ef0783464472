/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FIX checksum calculation.
//!
//! The CheckSum (tag 10) is the sum of every byte from the start of the
//! message up to, but not including, the `10=` tag, modulo 256. It is always
//! rendered as exactly three zero-padded digits.

/// Calculates the FIX checksum for the given data.
///
/// # Arguments
/// * `data` - The message bytes preceding the `10=` tag
///
/// # Returns
/// The checksum value (0-255).
///
/// # Example
/// ```
/// use tidefix_tagvalue::calculate_checksum;
///
/// let data = b"8=FIX.4.2\x019=5\x0135=0\x01";
/// assert_eq!(calculate_checksum(data), 161);
/// ```
#[inline]
#[must_use]
pub fn calculate_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Formats a checksum value as three zero-padded ASCII digits.
#[inline]
#[must_use]
pub fn format_checksum(checksum: u8) -> [u8; 3] {
    [
        b'0' + checksum / 100,
        b'0' + (checksum / 10) % 10,
        b'0' + checksum % 10,
    ]
}

/// Parses the text of a CheckSum field.
///
/// # Arguments
/// * `bytes` - The field value, which must be exactly three ASCII digits
///
/// # Returns
/// `Some(checksum)` if the text is three digits no greater than 255, `None` otherwise.
#[inline]
#[must_use]
pub fn parse_checksum(bytes: &[u8]) -> Option<u8> {
    let [d0, d1, d2] = bytes else {
        return None;
    };
    if !(d0.is_ascii_digit() && d1.is_ascii_digit() && d2.is_ascii_digit()) {
        return None;
    }
    let value = u16::from(d0 - b'0') * 100 + u16::from(d1 - b'0') * 10 + u16::from(d2 - b'0');
    u8::try_from(value).ok()
}

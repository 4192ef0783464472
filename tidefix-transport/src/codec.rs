/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Tokio codec for FIX message framing.
//!
//! Frames are cut at the CheckSum field: a frame runs from the start of the
//! buffer through the `<SOH>` that terminates the first `<SOH>10=` field.
//! BeginString, BodyLength and CheckSum are not verified here, so a garbled
//! frame still reaches the session parser, which decides how to react.

use bytes::{BufMut, BytesMut};
use memchr::memmem;
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

/// Errors that can occur during codec operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Message exceeds maximum size.
    #[error("message too large: {size} bytes exceeds maximum {max_size}")]
    MessageTooLarge {
        /// Bytes buffered or framed so far.
        size: usize,
        /// Maximum allowed size.
        max_size: usize,
    },

    /// I/O error.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// SOH delimiter.
const SOH: u8 = 0x01;

/// Start of the CheckSum field.
const CHECKSUM_FIELD: &[u8] = b"\x0110=";

/// Default frame size limit.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Tokio codec for FIX message framing.
#[derive(Debug, Clone)]
pub struct FixCodec {
    /// Maximum frame size in bytes.
    max_message_size: usize,
}

impl FixCodec {
    /// Creates a new codec with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    /// Sets the maximum frame size.
    #[must_use]
    pub const fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Returns the maximum frame size.
    #[must_use]
    #[inline]
    pub const fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    fn too_large(&self, size: usize) -> CodecError {
        CodecError::MessageTooLarge {
            size,
            max_size: self.max_message_size,
        }
    }
}

impl Default for FixCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the length of the first complete frame in `src`.
fn frame_len(src: &[u8]) -> Option<usize> {
    let checksum = memmem::find(src, CHECKSUM_FIELD)?;
    let value_start = checksum + CHECKSUM_FIELD.len();
    let end = memchr::memchr(SOH, &src[value_start..])?;
    Some(value_start + end + 1)
}

impl Decoder for FixCodec {
    type Item = BytesMut;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match frame_len(src) {
            Some(len) if len > self.max_message_size => Err(self.too_large(len)),
            Some(len) => Ok(Some(src.split_to(len))),
            None if src.len() > self.max_message_size => Err(self.too_large(src.len())),
            None => Ok(None),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if !src.is_empty() {
            debug!(bytes = src.len(), "discarding partial frame at end of stream");
            src.clear();
        }
        Ok(None)
    }
}

impl Encoder<&[u8]> for FixCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.len() > self.max_message_size {
            return Err(self.too_large(item.len()));
        }
        dst.reserve(item.len());
        dst.put_slice(item);
        Ok(())
    }
}

impl Encoder<BytesMut> for FixCodec {
    type Error = CodecError;

    fn encode(&mut self, item: BytesMut, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.encode(&item[..], dst)
    }
}

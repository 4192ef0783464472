/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # TideFix Transport
//!
//! Byte-stream framing for the TideFix session engine.
//!
//! [`FixCodec`] implements the `tokio_util` codec traits. It cuts a stream
//! into raw frames at the CheckSum field and leaves validation to the
//! session parser.

pub mod codec;

pub use codec::{CodecError, DEFAULT_MAX_MESSAGE_SIZE, FixCodec};

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # TideFix Tag-Value
//!
//! FIX tag=value parsing and formatting for the TideFix session engine.
//!
//! ## Features
//!
//! - **Zero-copy field reader**: values reference the original buffer, `memchr`
//!   finds delimiters
//! - **Strict framing**: BeginString, BodyLength and CheckSum are verified before
//!   any field is interpreted
//! - **Typed messages**: schema-driven [`Message`]s with repeating groups
//! - **Parser outcomes**: [`ParseFailure`] separates garbled input from
//!   rejectable messages

pub mod checksum;
pub mod decoder;
pub mod encoder;
pub mod header;
pub mod message;
pub mod parser;

pub use checksum::calculate_checksum;
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use header::MessageHeader;
pub use message::Message;
pub use parser::{ParseFailure, Parser, ParserCallback};

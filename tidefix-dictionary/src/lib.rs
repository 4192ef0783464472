/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # TideFix Dictionary
//!
//! The static FIX 4.2 catalogue used by the TideFix session engine.
//!
//! This crate provides:
//! - **Versions**: [`Version`] and its exact BeginString
//! - **Tags**: one `const` [`Tag`](tidefix_core::Tag) per field, plus [`tags::lookup`]
//! - **Values**: enumerated field values such as [`Side`] and [`OrdType`]
//! - **Schemas**: head, standard header and body schemas, and [`MessageKind`]

pub mod schema;
pub mod tags;
pub mod values;
pub mod version;

pub use schema::MessageKind;
pub use values::{
    AllocTransType, EncryptMethod, ExecTransType, ExecType, HandlInst, OrdStatus, OrdType, Side,
    TimeInForce,
};
pub use version::Version;

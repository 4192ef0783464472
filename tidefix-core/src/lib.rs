/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # TideFix Core
//!
//! Core types, traits, and error definitions for the TideFix FIX session engine.
//!
//! This crate provides the building blocks shared by every TideFix crate:
//! - **Error types**: unified error handling with `thiserror`
//! - **Field types**: [`Tag`], [`FieldKind`], [`FieldValue`] and the [`FixEnum`] trait
//! - **Value codec**: strict per-kind encoding and decoding of field text
//! - **Containers**: schema-driven [`FieldContainer`]s with repeating groups
//! - **Core types**: [`SeqNum`], [`Timestamp`], [`CompId`], [`SessionId`], [`MsgType`]

pub mod codec;
pub mod container;
pub mod error;
pub mod field;
pub mod message;
pub mod types;

pub use container::{FieldContainer, GroupSpec, Predicate, Required, SchemaEntry, Slot};
pub use error::{DecodeError, EncodeError, FixError, Result, SessionError, StoreError};
pub use field::{FieldKind, FieldRef, FieldValue, FixEnum, Tag};
pub use message::MsgType;
pub use types::{
    BusinessRejectReason, CompId, SeqNum, SessionId, SessionRejectReason, Timestamp,
};

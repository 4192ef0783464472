/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # TideFix Store
//!
//! Sequence number persistence for the TideFix session engine.
//!
//! This crate provides:
//! - **SessionStore trait**: load and save the counters of a session
//! - **MemoryStore**: in-memory store for tests and stateless sessions
//! - **FileStore**: one `incoming:outgoing` text file per session

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{SequenceState, SessionStore};

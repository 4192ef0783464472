/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # TideFix
//!
//! A FIX tag/value session engine for Rust.
//!
//! TideFix frames and validates FIX 4.2 messages, keeps both sequence
//! counters of a session, and runs the session-level protocol: logon,
//! heartbeats and test requests, resend and gap fill, sequence reset,
//! rejects and logout.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tidefix::prelude::*;
//!
//! # async fn run() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfigBuilder::new()
//!     .sender_comp_id("initiator")
//!     .target_comp_id("OPENFIX")
//!     .build()?;
//!
//! let initiator = EngineBuilder::new()
//!     .with_session(config)
//!     .with_store(std::sync::Arc::new(FileStore::new("seqnums")))
//!     .build()?;
//! initiator.run("127.0.0.1:9876").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Fundamental types, field codec and error definitions
//! - [`dictionary`]: FIX 4.2 tags, enumerations and message schemas
//! - [`tagvalue`]: Message model, formatting and parsing
//! - [`session`]: Session layer protocol implementation
//! - [`store`]: Sequence number persistence
//! - [`transport`]: Stream framing
//! - [`engine`]: Async tokio runner

pub mod core {
    //! Core types, field codec and error definitions.
    pub use tidefix_core::*;
}

pub mod dictionary {
    //! FIX 4.2 tags, enumerations and message schemas.
    pub use tidefix_dictionary::*;
}

pub mod tagvalue {
    //! Message model, formatting and parsing.
    pub use tidefix_tagvalue::*;
}

pub mod session {
    //! Session layer protocol implementation.
    pub use tidefix_session::*;
}

pub mod store {
    //! Sequence number persistence.
    pub use tidefix_store::*;
}

pub mod transport {
    //! Stream framing.
    pub use tidefix_transport::*;
}

pub mod engine {
    //! Async tokio runner.
    pub use tidefix_engine::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use tidefix_core::{
        BusinessRejectReason, CompId, DecodeError, EncodeError, FieldValue, FixError, MsgType,
        Result, SeqNum, SessionError, SessionId, SessionRejectReason, StoreError, Timestamp,
    };

    // Dictionary
    pub use tidefix_dictionary::{MessageKind, OrdType, Side, Version};

    // Tag-value encoding
    pub use tidefix_tagvalue::{Message, ParseFailure, Parser, calculate_checksum};

    // Session
    pub use tidefix_session::{
        Connection, MessageVisitor, Session, SessionConfig, SessionConfigBuilder, SessionState,
        SystemTimeSource, TimeSource,
    };

    // Store
    pub use tidefix_store::{FileStore, MemoryStore, SequenceState, SessionStore};

    // Transport
    pub use tidefix_transport::{CodecError, FixCodec};

    // Engine
    pub use tidefix_engine::{Application, EngineBuilder, EngineError, Initiator, RejectReason};
}

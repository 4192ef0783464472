/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # TideFix Session
//!
//! FIX session layer protocol implementation for the TideFix engine.
//!
//! This crate provides:
//! - **Session**: the receive/send state machine with gap detection and recovery
//! - **Sequence management**: incoming and outgoing counters with persistence
//! - **Heartbeat handling**: Heartbeat/TestRequest escalation on idle ticks
//! - **Configuration**: Session configuration options and a validating builder
//! - **Seams**: [`Connection`], [`MessageVisitor`] and [`TimeSource`]

pub mod clock;
pub mod config;
pub mod connection;
pub mod heartbeat;
pub mod sequence;
pub mod session;
pub mod state;
pub mod visitor;

pub use clock::{FixedClock, SystemTimeSource, TimeSource};
pub use config::{SessionConfig, SessionConfigBuilder};
pub use connection::{Connection, RecordingConnection};
pub use heartbeat::{HeartbeatManager, KeepAlive};
pub use sequence::{SequenceCheck, SequenceManager};
pub use session::Session;
pub use state::SessionState;
pub use visitor::{DefaultMessageVisitor, MessageVisitor};

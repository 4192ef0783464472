/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # TideFix Engine
//!
//! Async runner for a TideFix session over tokio TCP.
//!
//! This crate provides:
//! - **Initiator**: connects, logs on and drives one session per task
//! - **Application trait**: async callbacks for lifecycle events and
//!   application messages
//! - **Builder API**: fluent configuration of the runner

pub mod application;
pub mod builder;
pub mod error;
pub mod initiator;
pub mod outbox;

pub use application::{Application, NoOpApplication, RejectReason};
pub use builder::EngineBuilder;
pub use error::EngineError;
pub use initiator::Initiator;
pub use outbox::Outbox;

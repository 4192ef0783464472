/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Engine errors.

use std::time::Duration;
use thiserror::Error;
use tidefix_core::error::FixError;
use tidefix_transport::CodecError;

/// Errors returned by the engine runner.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The TCP connection was not established in time.
    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// Socket failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Framing failure on the inbound stream.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Session or store failure.
    #[error(transparent)]
    Fix(#[from] FixError),

    /// The builder was not given a session configuration.
    #[error("no session configured")]
    MissingSession,
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

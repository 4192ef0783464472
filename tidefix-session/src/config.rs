/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Session configuration.
//!
//! This module provides configuration options for FIX sessions. The
//! configuration is read once when a [`Session`](crate::Session) is built.

use std::time::Duration;
use tidefix_core::error::SessionError;
use tidefix_core::types::{CompId, SessionId};
use tidefix_dictionary::Version;

/// Default heartbeat interval.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Default maximum size of one framed message.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Configuration for a FIX session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// FIX version; its BeginString must match every inbound message exactly.
    pub version: Version,
    /// Sender CompID (tag 49).
    pub sender_comp_id: CompId,
    /// Target CompID (tag 56).
    pub target_comp_id: CompId,
    /// Heartbeat interval sent in HeartBtInt (tag 108).
    pub heartbeat_interval: Duration,
    /// Whether Logon carries ResetSeqNumFlag=Y and resets both counters.
    pub reset_on_logon: bool,
    /// Maximum message size in bytes.
    pub max_message_size: usize,
}

impl SessionConfig {
    /// Creates a new session configuration with required fields.
    ///
    /// # Arguments
    /// * `version` - The FIX version
    /// * `sender_comp_id` - The sender CompID
    /// * `target_comp_id` - The target CompID
    #[must_use]
    pub fn new(version: Version, sender_comp_id: CompId, target_comp_id: CompId) -> Self {
        Self {
            version,
            sender_comp_id,
            target_comp_id,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            reset_on_logon: false,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Sets whether to reset sequence numbers on logon.
    #[must_use]
    pub const fn with_reset_on_logon(mut self, reset: bool) -> Self {
        self.reset_on_logon = reset;
        self
    }

    /// Sets the maximum message size.
    #[must_use]
    pub const fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Returns the BeginString of the configured version.
    #[inline]
    #[must_use]
    pub const fn begin_string(&self) -> &'static str {
        self.version.begin_string()
    }

    /// Returns the heartbeat interval in whole seconds, as sent in HeartBtInt.
    #[must_use]
    pub fn heartbeat_interval_secs(&self) -> u64 {
        self.heartbeat_interval.as_secs()
    }

    /// Returns the identity of the session described by this configuration.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        SessionId::new(
            self.begin_string(),
            self.sender_comp_id.clone(),
            self.target_comp_id.clone(),
        )
    }
}

/// Builder for session configuration.
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    version: Option<Version>,
    sender_comp_id: Option<String>,
    target_comp_id: Option<String>,
    heartbeat_interval: Option<Duration>,
    reset_on_logon: bool,
    max_message_size: Option<usize>,
}

impl SessionConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the FIX version. Defaults to FIX 4.2.
    #[must_use]
    pub const fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the sender CompID.
    #[must_use]
    pub fn sender_comp_id(mut self, id: impl Into<String>) -> Self {
        self.sender_comp_id = Some(id.into());
        self
    }

    /// Sets the target CompID.
    #[must_use]
    pub fn target_comp_id(mut self, id: impl Into<String>) -> Self {
        self.target_comp_id = Some(id.into());
        self
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub const fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = Some(interval);
        self
    }

    /// Sets whether to reset on logon.
    #[must_use]
    pub const fn reset_on_logon(mut self, reset: bool) -> Self {
        self.reset_on_logon = reset;
        self
    }

    /// Sets the maximum message size.
    #[must_use]
    pub const fn max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = Some(size);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    /// `SessionError::Configuration` if a CompID is missing, empty or too long,
    /// if the heartbeat interval is shorter than one second, or if the maximum
    /// message size is zero.
    pub fn build(self) -> Result<SessionConfig, SessionError> {
        let sender = comp_id("sender_comp_id", self.sender_comp_id)?;
        let target = comp_id("target_comp_id", self.target_comp_id)?;

        let mut config = SessionConfig::new(self.version.unwrap_or_default(), sender, target)
            .with_reset_on_logon(self.reset_on_logon);

        if let Some(interval) = self.heartbeat_interval {
            if interval.as_secs() == 0 {
                return Err(SessionError::Configuration(
                    "heartbeat_interval must be at least one second".to_string(),
                ));
            }
            config.heartbeat_interval = interval;
        }
        if let Some(size) = self.max_message_size {
            if size == 0 {
                return Err(SessionError::Configuration(
                    "max_message_size must be positive".to_string(),
                ));
            }
            config.max_message_size = size;
        }

        Ok(config)
    }
}

fn comp_id(name: &str, value: Option<String>) -> Result<CompId, SessionError> {
    let value = value.ok_or_else(|| SessionError::Configuration(format!("{name} is required")))?;
    CompId::new(&value)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| SessionError::Configuration(format!("{name} '{value}' is not a valid CompID")))
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Engine builder for fluent configuration.
//!
//! This module provides a builder API for configuring an [`Initiator`].

use crate::application::{Application, NoOpApplication};
use crate::error::{EngineError, Result};
use crate::initiator::Initiator;
use std::sync::Arc;
use std::time::Duration;
use tidefix_session::{SessionConfig, SystemTimeSource, TimeSource};
use tidefix_store::{MemoryStore, SessionStore};

/// Default time allowed for the TCP connect.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for configuring a FIX engine.
pub struct EngineBuilder<A: Application = NoOpApplication> {
    /// Application callback handler.
    application: Arc<A>,
    /// Session configuration.
    session: Option<SessionConfig>,
    /// Sequence number persistence; in memory when unset.
    store: Option<Arc<dyn SessionStore>>,
    /// Clock for SendingTime; the system clock when unset.
    clock: Option<Arc<dyn TimeSource>>,
    /// Connection timeout.
    connect_timeout: Duration,
}

impl<A: Application> std::fmt::Debug for EngineBuilder<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("session", &self.session)
            .field("has_store", &self.store.is_some())
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for EngineBuilder<NoOpApplication> {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder<NoOpApplication> {
    /// Creates a new engine builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            application: Arc::new(NoOpApplication),
            session: None,
            store: None,
            clock: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl<A: Application> EngineBuilder<A> {
    /// Sets the application callback handler.
    #[must_use]
    pub fn with_application<B: Application>(self, application: B) -> EngineBuilder<B> {
        EngineBuilder {
            application: Arc::new(application),
            session: self.session,
            store: self.store,
            clock: self.clock,
            connect_timeout: self.connect_timeout,
        }
    }

    /// Sets the session configuration.
    #[must_use]
    pub fn with_session(mut self, config: SessionConfig) -> Self {
        self.session = Some(config);
        self
    }

    /// Sets the sequence number store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the clock used for SendingTime.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Returns the configured session.
    #[must_use]
    pub const fn session(&self) -> Option<&SessionConfig> {
        self.session.as_ref()
    }

    /// Returns the connection timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the application handler.
    #[must_use]
    pub fn application(&self) -> Arc<A> {
        Arc::clone(&self.application)
    }

    /// Builds the initiator.
    ///
    /// # Errors
    /// `EngineError::MissingSession` if no session was configured.
    pub fn build(self) -> Result<Initiator<A>> {
        let config = self.session.ok_or(EngineError::MissingSession)?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn SessionStore>);
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemTimeSource) as Arc<dyn TimeSource>);
        Ok(Initiator::new(
            self.application,
            config,
            store,
            clock,
            self.connect_timeout,
        ))
    }
}

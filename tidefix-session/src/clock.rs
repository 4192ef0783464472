/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Time sources for SendingTime stamping and accuracy checks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tidefix_core::types::Timestamp;

/// Source of the current UTC time.
pub trait TimeSource: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    #[inline]
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A manually driven clock.
///
/// Clones share the same instant, so a test can keep one handle and move
/// time forward after handing another to a session.
#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    nanos: Arc<AtomicU64>,
}

impl FixedClock {
    /// Creates a clock frozen at `at`.
    #[must_use]
    pub fn new(at: Timestamp) -> Self {
        Self {
            nanos: Arc::new(AtomicU64::new(at.as_nanos())),
        }
    }

    /// Moves the clock to `at`.
    pub fn set(&self, at: Timestamp) {
        self.nanos.store(at.as_nanos(), Ordering::SeqCst);
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.set(self.now().plus(delta));
    }
}

impl TimeSource for FixedClock {
    #[inline]
    fn now(&self) -> Timestamp {
        Timestamp::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Heartbeat and TestRequest management.
//!
//! The runner calls [`HeartbeatManager::tick`] whenever a full heartbeat
//! interval passes without inbound traffic. Consecutive idle ticks escalate:
//! - first tick: send a Heartbeat
//! - second tick: send a TestRequest
//! - a tick while that TestRequest is unanswered: the session has timed out
//!
//! Any inbound message answers the TestRequest.

use std::time::Duration;

/// What the session should do on an idle tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepAlive {
    /// Send a Heartbeat.
    Heartbeat,
    /// Send a TestRequest.
    TestRequest,
    /// The counterparty did not answer a TestRequest.
    TimedOut,
}

/// Manages heartbeat escalation for a FIX session.
#[derive(Debug)]
pub struct HeartbeatManager {
    /// Heartbeat interval.
    interval: Duration,
    /// Idle ticks since the last inbound message.
    idle_ticks: u32,
    /// Pending TestRequest ID, if any.
    test_request_pending: Option<String>,
    /// Counter used to build unique TestReqIDs.
    test_requests_sent: u64,
}

impl HeartbeatManager {
    /// Creates a new heartbeat manager with the specified interval.
    ///
    /// # Arguments
    /// * `interval` - The heartbeat interval
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            idle_ticks: 0,
            test_request_pending: None,
            test_requests_sent: 0,
        }
    }

    /// Returns the heartbeat interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Replaces the interval with the one negotiated at logon.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Records that a message was received.
    ///
    /// Any inbound message proves the counterparty is alive, so a pending
    /// TestRequest is cleared whether or not a Heartbeat echoed its id.
    #[inline]
    pub fn on_message_received(&mut self) {
        self.idle_ticks = 0;
        self.test_request_pending = None;
    }

    /// Advances the idle counter and returns the action to take.
    pub fn tick(&mut self) -> KeepAlive {
        if self.test_request_pending.is_some() {
            return KeepAlive::TimedOut;
        }
        self.idle_ticks = self.idle_ticks.saturating_add(1);
        if self.idle_ticks == 1 {
            KeepAlive::Heartbeat
        } else {
            KeepAlive::TestRequest
        }
    }

    /// Records that a TestRequest was sent.
    ///
    /// # Arguments
    /// * `test_req_id` - The TestReqID that was sent
    pub fn on_test_request_sent(&mut self, test_req_id: String) {
        self.test_request_pending = Some(test_req_id);
    }

    /// Generates the next TestReqID.
    pub fn next_test_req_id(&mut self) -> String {
        self.test_requests_sent += 1;
        format!("TEST{}", self.test_requests_sent)
    }

    /// Returns the pending TestRequest ID, if any.
    #[must_use]
    pub fn pending_test_request(&self) -> Option<&str> {
        self.test_request_pending.as_deref()
    }

    /// Returns the number of idle ticks since the last inbound message.
    #[must_use]
    pub const fn idle_ticks(&self) -> u32 {
        self.idle_ticks
    }

    /// Resets the manager state.
    pub fn reset(&mut self) {
        self.idle_ticks = 0;
        self.test_request_pending = None;
    }
}

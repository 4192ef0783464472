/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! The FIX session state machine.
//!
//! A [`Session`] owns both sequence counters and is the only code that moves
//! them. Inbound frames go through [`Session::receive`], which validates the
//! message, answers administrative traffic and hands application messages to
//! a [`MessageVisitor`]. Everything the session sends is stamped by
//! [`Session::send`] and written to a [`Connection`].
//!
//! # Receive order
//!
//! 1. Garbled input is dropped.
//! 2. Identified but invalid messages are rejected and their sequence number
//!    consumed.
//! 3. Header checks: BeginString, CompIDs, SendingTime, OrigSendingTime.
//! 4. Anything but a Logon before logon completes ends the session.
//! 5. Sequence check, except for a SequenceReset in reset mode.
//! 6. Dispatch by message kind.

use crate::clock::{SystemTimeSource, TimeSource};
use crate::config::SessionConfig;
use crate::connection::Connection;
use crate::heartbeat::{HeartbeatManager, KeepAlive};
use crate::sequence::{SequenceCheck, SequenceManager};
use crate::state::SessionState;
use crate::visitor::MessageVisitor;
use std::sync::Arc;
use std::time::Duration;
use tidefix_core::error::Result;
use tidefix_core::types::{BusinessRejectReason, SeqNum, SessionId, SessionRejectReason};
use tidefix_core::MsgType;
use tidefix_dictionary::tags::*;
use tidefix_dictionary::{EncryptMethod, MessageKind};
use tidefix_store::{MemoryStore, SessionStore};
use tidefix_tagvalue::{Message, ParseFailure, Parser};
use tracing::{debug, info, warn};

/// A FIX session endpoint.
pub struct Session {
    config: SessionConfig,
    id: SessionId,
    state: SessionState,
    sequences: SequenceManager,
    heartbeat: HeartbeatManager,
    available: bool,
    parser: Parser,
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn TimeSource>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("sequences", &self.sequences)
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session, restoring its counters from `store` when present.
    ///
    /// # Arguments
    /// * `config` - Session configuration
    /// * `store` - Sequence number persistence
    /// * `clock` - Time source for SendingTime
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn new(
        config: SessionConfig,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self> {
        let id = config.session_id();
        let mut sequences = SequenceManager::new();
        if let Some(state) = store.load(&id)? {
            debug!(session = %id, incoming = %state.incoming, outgoing = %state.outgoing, "restored sequence numbers");
            sequences.restore(state);
        }
        Ok(Self {
            heartbeat: HeartbeatManager::new(config.heartbeat_interval),
            config,
            id,
            state: SessionState::Disconnected,
            sequences,
            available: true,
            parser: Parser::new(),
            store,
            clock,
        })
    }

    /// Creates a session backed by a [`MemoryStore`] and the system clock.
    #[must_use]
    pub fn in_memory(config: SessionConfig) -> Self {
        let id = config.session_id();
        Self {
            heartbeat: HeartbeatManager::new(config.heartbeat_interval),
            config,
            id,
            state: SessionState::Disconnected,
            sequences: SequenceManager::new(),
            available: true,
            parser: Parser::new(),
            store: Arc::new(MemoryStore::new()),
            clock: Arc::new(SystemTimeSource),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the session identity.
    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Returns true once the Logon exchange has completed.
    #[must_use]
    pub const fn is_logged_on(&self) -> bool {
        self.state.is_logged_on()
    }

    /// Returns the next sequence number expected from the counterparty.
    #[must_use]
    pub const fn incoming_seq(&self) -> SeqNum {
        self.sequences.incoming()
    }

    /// Returns the next sequence number this side will assign.
    #[must_use]
    pub const fn outgoing_seq(&self) -> SeqNum {
        self.sequences.outgoing()
    }

    /// Returns the heartbeat interval, as negotiated once logged on.
    #[must_use]
    pub const fn heartbeat_interval(&self) -> Duration {
        self.heartbeat.interval()
    }

    /// Returns whether application messages are delivered.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }

    /// Marks the application as available or not. While unavailable,
    /// application messages are answered with a BusinessMessageReject.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Returns true for a sequence number below the expected one that is not
    /// a possible duplicate.
    #[must_use]
    pub fn is_too_low_seq_num(&self, seq: SeqNum, poss_dup: bool) -> bool {
        self.sequences.is_too_low_seq_num(seq, poss_dup)
    }

    /// Persists both counters.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.id, self.sequences.state())?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Outbound
    // ---------------------------------------------------------------------

    /// Stamps, formats and sends a message with the next outgoing sequence
    /// number, then advances the counter.
    ///
    /// # Errors
    /// Returns an error if formatting or the connection fails; the counter
    /// is left unchanged in that case.
    pub fn send(&mut self, conn: &mut impl Connection, mut message: Message) -> Result<()> {
        let seq = self.sequences.outgoing();
        self.stamp(&mut message, seq)?;
        self.transmit(conn, &message)?;
        self.sequences.increment_outgoing();
        Ok(())
    }

    /// Sends a Logon and waits for the counterparty's Logon.
    ///
    /// With `reset_on_logon` both counters restart at 1 and the Logon carries
    /// ResetSeqNumFlag=Y.
    ///
    /// # Errors
    /// `SessionError::InvalidState` unless disconnected, or a send failure.
    pub fn logon(&mut self, conn: &mut impl Connection) -> Result<()> {
        self.state.expect(SessionState::Disconnected)?;
        let reset = self.config.reset_on_logon;
        if reset {
            self.sequences.reset();
            self.save()?;
        }
        self.send_logon(conn, self.config.heartbeat_interval_secs(), reset)?;
        self.state = SessionState::LoggingOn;
        info!(session = %self.id, "logon sent");
        Ok(())
    }

    /// Sends a Logout and waits for the counterparty's Logout.
    ///
    /// # Errors
    /// Returns an error if the send fails.
    pub fn logout(&mut self, conn: &mut impl Connection, text: Option<&str>) -> Result<()> {
        let mut message = Message::new(MessageKind::Logout);
        if let Some(text) = text {
            message.set(TEXT, text)?;
        }
        self.send(conn, message)?;
        self.state = SessionState::LoggingOut;
        Ok(())
    }

    /// Sends a Heartbeat, echoing `test_req_id` when answering a TestRequest.
    ///
    /// # Errors
    /// Returns an error if the send fails.
    pub fn heartbeat(&mut self, conn: &mut impl Connection, test_req_id: Option<&str>) -> Result<()> {
        let mut message = Message::new(MessageKind::Heartbeat);
        if let Some(id) = test_req_id {
            message.set(TEST_REQ_ID, id)?;
        }
        self.send(conn, message)
    }

    /// Sends a TestRequest with a fresh TestReqID and returns that id.
    ///
    /// # Errors
    /// Returns an error if the send fails.
    pub fn test_request(&mut self, conn: &mut impl Connection) -> Result<String> {
        let id = self.heartbeat.next_test_req_id();
        let mut message = Message::new(MessageKind::TestRequest);
        message.set(TEST_REQ_ID, id.as_str())?;
        self.send(conn, message)?;
        self.heartbeat.on_test_request_sent(id.clone());
        Ok(id)
    }

    /// Sends a SequenceReset in reset mode and moves the outgoing counter
    /// to `new_seq_no`.
    ///
    /// The reset carries the current outgoing sequence number.
    ///
    /// # Errors
    /// Returns an error if the send or the store update fails.
    pub fn sequence_reset(&mut self, conn: &mut impl Connection, new_seq_no: SeqNum) -> Result<()> {
        let mut message = Message::new(MessageKind::SequenceReset);
        message.set(NEW_SEQ_NO, new_seq_no)?;
        let seq = self.sequences.outgoing();
        self.stamp(&mut message, seq)?;
        self.transmit(conn, &message)?;

        self.sequences.set_outgoing(new_seq_no);
        self.store.reset_outgoing_seq(
            &self.config.sender_comp_id,
            &self.config.target_comp_id,
            self.sequences.incoming(),
            new_seq_no,
        )?;
        info!(session = %self.id, new_seq_no = %new_seq_no, "outgoing sequence reset");
        Ok(())
    }

    /// Sends a session-level Reject.
    ///
    /// # Errors
    /// Returns an error if the send fails.
    pub fn reject(
        &mut self,
        conn: &mut impl Connection,
        ref_seq: SeqNum,
        reason: SessionRejectReason,
        text: &str,
    ) -> Result<()> {
        self.send_reject(conn, ref_seq, reason, None, None, text)
    }

    /// Sends a BusinessMessageReject.
    ///
    /// # Errors
    /// Returns an error if the send fails.
    pub fn business_reject(
        &mut self,
        conn: &mut impl Connection,
        ref_seq: SeqNum,
        ref_msg_type: &MsgType,
        reason: BusinessRejectReason,
        text: &str,
    ) -> Result<()> {
        warn!(session = %self.id, ref_seq = %ref_seq, %ref_msg_type, %reason, text, "sending business reject");
        let mut message = Message::new(MessageKind::BusinessMessageReject);
        message
            .set(REF_SEQ_NUM, ref_seq)?
            .set(REF_MSG_TYPE, ref_msg_type.as_str())?
            .set(BUSINESS_REJECT_REASON, reason)?
            .set(TEXT, text)?;
        self.send(conn, message)
    }

    /// Asks the counterparty to resend `[begin, end]`; an `end` of 0 means
    /// everything from `begin` on.
    ///
    /// # Errors
    /// Returns an error if the send fails.
    pub fn resend_request(&mut self, conn: &mut impl Connection, begin: SeqNum, end: SeqNum) -> Result<()> {
        let mut message = Message::new(MessageKind::ResendRequest);
        message.set(BEGIN_SEQ_NO, begin)?.set(END_SEQ_NO, end)?;
        self.send(conn, message)
    }

    /// Handles one idle heartbeat interval: Heartbeat first, then a
    /// TestRequest, then Logout and disconnect if it goes unanswered.
    ///
    /// # Errors
    /// Returns an error if a send or the store fails.
    pub fn keep_alive(&mut self, conn: &mut impl Connection) -> Result<()> {
        match self.heartbeat.tick() {
            KeepAlive::Heartbeat => self.heartbeat(conn, None),
            KeepAlive::TestRequest => self.test_request(conn).map(drop),
            KeepAlive::TimedOut => {
                warn!(session = %self.id, "TestRequest unanswered, logging out");
                self.logout(conn, Some("TestRequest timed out"))?;
                self.disconnect(conn)
            }
        }
    }

    /// Persists the counters and closes the connection.
    ///
    /// # Errors
    /// Returns an error if the store write fails; the connection is closed
    /// either way.
    pub fn disconnect(&mut self, conn: &mut impl Connection) -> Result<()> {
        conn.close();
        self.state = SessionState::Disconnected;
        self.heartbeat.reset();
        info!(session = %self.id, incoming = %self.sequences.incoming(), outgoing = %self.sequences.outgoing(), "disconnected");
        self.save()
    }

    fn send_logon(&mut self, conn: &mut impl Connection, heart_bt_int: u64, reset: bool) -> Result<()> {
        let mut message = Message::new(MessageKind::Logon);
        message
            .set(ENCRYPT_METHOD, EncryptMethod::None)?
            .set(HEART_BT_INT, heart_bt_int)?;
        if reset {
            message.set(RESET_SEQ_NUM_FLAG, true)?;
        }
        self.send(conn, message)
    }

    fn send_reject(
        &mut self,
        conn: &mut impl Connection,
        ref_seq: SeqNum,
        reason: SessionRejectReason,
        ref_tag: Option<u32>,
        ref_msg_type: Option<&MsgType>,
        text: &str,
    ) -> Result<()> {
        warn!(session = %self.id, ref_seq = %ref_seq, %reason, ?ref_tag, text, "sending reject");
        let mut message = Message::new(MessageKind::Reject);
        message.set(REF_SEQ_NUM, ref_seq)?;
        if let Some(tag) = ref_tag {
            message.set(REF_TAG_ID, tag)?;
        }
        if let Some(msg_type) = ref_msg_type {
            message.set(REF_MSG_TYPE, msg_type.as_str())?;
        }
        message.set(SESSION_REJECT_REASON, reason)?.set(TEXT, text)?;
        self.send(conn, message)
    }

    /// Fills in BeginString, CompIDs, MsgSeqNum and SendingTime.
    fn stamp(&self, message: &mut Message, seq: SeqNum) -> Result<()> {
        let now = self.clock.now();
        let header = message.header_mut();
        header.head_mut().set(BEGIN_STRING, self.config.begin_string())?;
        header
            .fields_mut()
            .set(SENDER_COMP_ID, &self.config.sender_comp_id)?
            .set(TARGET_COMP_ID, &self.config.target_comp_id)?
            .set(MSG_SEQ_NUM, seq)?
            .set(SENDING_TIME, now)?;
        Ok(())
    }

    fn transmit(&self, conn: &mut impl Connection, message: &Message) -> Result<()> {
        let bytes = message.format()?;
        conn.send(&bytes)?;
        debug!(session = %self.id, msg_type = %message.msg_type(), seq = ?message.seq_num(), "sent");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Inbound
    // ---------------------------------------------------------------------

    /// Processes one framed inbound message.
    ///
    /// # Arguments
    /// * `conn` - Where replies go
    /// * `raw` - One complete message, from `8=` through the CheckSum delimiter
    /// * `visitor` - Receives application messages and lifecycle events
    ///
    /// # Errors
    /// Only transport and store failures; protocol problems are answered on
    /// the wire.
    pub fn receive(
        &mut self,
        conn: &mut impl Connection,
        raw: &[u8],
        visitor: &mut impl MessageVisitor,
    ) -> Result<()> {
        self.heartbeat.on_message_received();
        let message = match self.parser.decode(raw) {
            Ok(message) => message,
            Err(failure) => return self.on_parse_failure(conn, failure),
        };
        debug!(session = %self.id, msg_type = %message.msg_type(), seq = ?message.seq_num(), "received");

        if !self.check_header(conn, &message)? {
            return Ok(());
        }

        let kind = message.kind();
        if !self.state.is_logged_on() && kind != MessageKind::Logon {
            warn!(session = %self.id, msg_type = %message.msg_type(), "first message is not a Logon");
            self.logout(conn, Some("First message not a logon"))?;
            return self.disconnect(conn);
        }

        let Some(seq) = message.seq_num() else {
            return Ok(());
        };
        if kind == MessageKind::SequenceReset && !message.body().flag(GAP_FILL_FLAG) {
            return self.on_sequence_reset(conn, &message, seq);
        }

        match self.sequences.check(seq, message.is_poss_dup()) {
            SequenceCheck::Expected => self.dispatch(conn, message, seq, visitor),
            SequenceCheck::Gap { expected, received } => {
                warn!(session = %self.id, %expected, %received, "sequence gap detected");
                if kind == MessageKind::Logon {
                    self.on_logon(conn, &message, visitor)?;
                }
                self.resend_request(conn, expected, SeqNum::new(0))
            }
            SequenceCheck::Duplicate { expected, received } => {
                debug!(session = %self.id, %expected, %received, "ignoring possible duplicate");
                Ok(())
            }
            SequenceCheck::TooLow { expected, received } => {
                warn!(session = %self.id, %expected, %received, "MsgSeqNum too low");
                let text = format!("MsgSeqNum too low, expecting {expected} but received {received}");
                self.logout(conn, Some(&text))?;
                self.disconnect(conn)
            }
        }
    }

    fn on_parse_failure(&mut self, conn: &mut impl Connection, failure: ParseFailure) -> Result<()> {
        let seq = match &failure {
            ParseFailure::Garbled { text } => {
                warn!(session = %self.id, text, "dropping garbled message");
                return Ok(());
            }
            ParseFailure::InvalidMsgType { seq, .. }
            | ParseFailure::UnsupportedMsgType { seq, .. }
            | ParseFailure::InvalidMessage { seq, .. } => *seq,
        };
        self.sequences.consume(seq);

        match failure {
            ParseFailure::InvalidMessage { msg_type, error, .. }
                if msg_type == MsgType::Logon && !self.state.is_logged_on() =>
            {
                warn!(session = %self.id, %error, "invalid Logon");
                self.logout(conn, Some(&error.to_string()))?;
                self.disconnect(conn)
            }
            ParseFailure::InvalidMessage { msg_type, error, .. } => self.send_reject(
                conn,
                seq,
                error.reject_reason(),
                error.ref_tag(),
                Some(&msg_type),
                &error.to_string(),
            ),
            ParseFailure::InvalidMsgType { msg_type, .. } => self.send_reject(
                conn,
                seq,
                SessionRejectReason::InvalidMsgType,
                Some(MSG_TYPE.number()),
                Some(&msg_type),
                &format!("MsgType(35): Invalid message type: {msg_type}"),
            ),
            ParseFailure::UnsupportedMsgType { msg_type, .. } => self.business_reject(
                conn,
                seq,
                &msg_type,
                BusinessRejectReason::UnsupportedMessageType,
                &format!("Unsupported message type: {msg_type}"),
            ),
            ParseFailure::Garbled { .. } => Ok(()),
        }
    }

    /// Returns false when the message was answered and must not be processed.
    fn check_header(&mut self, conn: &mut impl Connection, message: &Message) -> Result<bool> {
        let header = message.header();
        let seq = message.seq_num().unwrap_or_default();
        let msg_type = message.msg_type();

        if header.begin_string() != Some(self.config.begin_string()) {
            warn!(session = %self.id, begin_string = ?header.begin_string(), "BeginString mismatch");
            self.logout(conn, Some("Incorrect BeginString"))?;
            self.disconnect(conn)?;
            return Ok(false);
        }

        let sender_ok = header.sender_comp_id() == Some(self.config.target_comp_id.as_str());
        let target_ok = header.target_comp_id() == Some(self.config.sender_comp_id.as_str());
        if !sender_ok || !target_ok {
            let tag = if sender_ok { TARGET_COMP_ID } else { SENDER_COMP_ID };
            self.send_reject(
                conn,
                seq,
                SessionRejectReason::CompIdProblem,
                Some(tag.number()),
                Some(&msg_type),
                "CompID problem",
            )?;
            self.sequences.consume(seq);
            self.logout(conn, Some("CompID problem"))?;
            self.disconnect(conn)?;
            return Ok(false);
        }

        if !header.has_accurate_sending_time(self.clock.now()) {
            self.send_reject(
                conn,
                seq,
                SessionRejectReason::SendingTimeAccuracyProblem,
                Some(SENDING_TIME.number()),
                Some(&msg_type),
                "SendingTime accuracy problem",
            )?;
            self.sequences.consume(seq);
            self.logout(conn, Some("SendingTime accuracy problem"))?;
            self.disconnect(conn)?;
            return Ok(false);
        }

        if !header.has_consistent_orig_sending_time() {
            self.send_reject(
                conn,
                seq,
                SessionRejectReason::SendingTimeAccuracyProblem,
                Some(ORIG_SENDING_TIME.number()),
                Some(&msg_type),
                "OrigSendingTime later than SendingTime",
            )?;
            self.sequences.consume(seq);
            return Ok(false);
        }

        Ok(true)
    }

    fn dispatch(
        &mut self,
        conn: &mut impl Connection,
        message: Message,
        seq: SeqNum,
        visitor: &mut impl MessageVisitor,
    ) -> Result<()> {
        let kind = message.kind();
        if kind != MessageKind::SequenceReset {
            self.sequences.increment_incoming();
        }

        match kind {
            MessageKind::Logon => self.on_logon(conn, &message, visitor),
            MessageKind::Heartbeat => {
                debug!(session = %self.id, test_req_id = ?message.body().get_str(TEST_REQ_ID).ok(), "heartbeat");
                Ok(())
            }
            MessageKind::TestRequest => {
                let id = message.body().get_str(TEST_REQ_ID)?.to_owned();
                self.heartbeat(conn, Some(&id))
            }
            MessageKind::ResendRequest => self.on_resend_request(conn, &message),
            MessageKind::SequenceReset => {
                if message.body().flag(GAP_FILL_FLAG) {
                    self.on_gap_fill(conn, &message, seq)
                } else {
                    self.on_sequence_reset(conn, &message, seq)
                }
            }
            MessageKind::Reject => {
                warn!(
                    session = %self.id,
                    ref_seq = ?message.body().get_int(REF_SEQ_NUM).ok(),
                    reason = ?message.body().get_str(SESSION_REJECT_REASON).ok(),
                    text = ?message.body().get_str(TEXT).ok(),
                    "received reject"
                );
                Ok(())
            }
            MessageKind::Logout => self.on_logout(conn, &message, visitor),
            MessageKind::BusinessMessageReject => {
                warn!(
                    session = %self.id,
                    ref_seq = ?message.body().get_int(REF_SEQ_NUM).ok(),
                    ref_msg_type = ?message.body().get_str(REF_MSG_TYPE).ok(),
                    reason = ?message.body().get_str(BUSINESS_REJECT_REASON).ok(),
                    "received business reject"
                );
                if self.available {
                    visitor.visit_application(&message);
                }
                Ok(())
            }
            MessageKind::ExecutionReport
            | MessageKind::NewOrderSingle
            | MessageKind::OrderCancelRequest
            | MessageKind::OrderCancelReplaceRequest
            | MessageKind::AllocationInstruction => {
                if self.available {
                    visitor.visit_application(&message);
                    Ok(())
                } else {
                    self.business_reject(
                        conn,
                        seq,
                        &message.msg_type(),
                        BusinessRejectReason::ApplicationNotAvailable,
                        "Application not available",
                    )
                }
            }
        }
    }

    fn on_logon(
        &mut self,
        conn: &mut impl Connection,
        message: &Message,
        visitor: &mut impl MessageVisitor,
    ) -> Result<()> {
        let heart_bt_int = message.body().get_int(HEART_BT_INT)?;
        let heart_bt_int = u64::try_from(heart_bt_int).unwrap_or(0);
        if heart_bt_int > 0 {
            self.heartbeat.set_interval(Duration::from_secs(heart_bt_int));
        }

        if self.state == SessionState::Disconnected {
            self.send_logon(conn, heart_bt_int, false)?;
        }
        self.state = SessionState::Active;
        self.save()?;
        info!(session = %self.id, heart_bt_int, "logged on");
        visitor.on_logon(&self.id);
        Ok(())
    }

    fn on_resend_request(&mut self, conn: &mut impl Connection, message: &Message) -> Result<()> {
        let begin = message.body().get_seq_num(BEGIN_SEQ_NO)?;
        let outgoing = self.sequences.outgoing();
        if begin >= outgoing {
            warn!(session = %self.id, %begin, %outgoing, "ResendRequest beyond last sent message");
            return Ok(());
        }

        info!(session = %self.id, %begin, new_seq_no = %outgoing, "answering ResendRequest with gap fill");
        let mut gap_fill = Message::new(MessageKind::SequenceReset);
        gap_fill
            .set(GAP_FILL_FLAG, true)?
            .set(NEW_SEQ_NO, outgoing)?;
        self.stamp(&mut gap_fill, begin)?;
        let now = self.clock.now();
        gap_fill
            .header_mut()
            .fields_mut()
            .set(POSS_DUP_FLAG, true)?
            .set(ORIG_SENDING_TIME, now)?;
        self.transmit(conn, &gap_fill)
    }

    fn on_gap_fill(&mut self, conn: &mut impl Connection, message: &Message, seq: SeqNum) -> Result<()> {
        let new_seq_no = message.body().get_seq_num(NEW_SEQ_NO)?;
        if new_seq_no > seq {
            self.sequences.advance_incoming_to(new_seq_no);
            debug!(session = %self.id, %seq, %new_seq_no, "gap filled");
            Ok(())
        } else {
            self.send_reject(
                conn,
                seq,
                SessionRejectReason::ValueIsIncorrect,
                Some(NEW_SEQ_NO.number()),
                Some(&MsgType::SequenceReset),
                &format!("Attempt to lower sequence number, invalid value NewSeqNo(36)={new_seq_no}"),
            )
        }
    }

    fn on_sequence_reset(&mut self, conn: &mut impl Connection, message: &Message, seq: SeqNum) -> Result<()> {
        let new_seq_no = message.body().get_seq_num(NEW_SEQ_NO)?;
        let expected = self.sequences.incoming();
        if new_seq_no < expected {
            return self.send_reject(
                conn,
                seq,
                SessionRejectReason::ValueIsIncorrect,
                Some(NEW_SEQ_NO.number()),
                Some(&MsgType::SequenceReset),
                &format!("Attempt to lower sequence number, invalid value NewSeqNo(36)={new_seq_no}"),
            );
        }
        info!(session = %self.id, %expected, %new_seq_no, "incoming sequence reset");
        self.sequences.set_incoming(new_seq_no);
        Ok(())
    }

    fn on_logout(
        &mut self,
        conn: &mut impl Connection,
        message: &Message,
        visitor: &mut impl MessageVisitor,
    ) -> Result<()> {
        let solicited = self.state == SessionState::LoggingOut;
        if !solicited {
            self.logout(conn, None)?;
        }
        info!(session = %self.id, solicited, text = ?message.body().get_str(TEXT).ok(), "logged out");
        visitor.on_logout(&self.id);
        self.disconnect(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::SessionConfigBuilder;
    use crate::connection::RecordingConnection;
    use crate::visitor::DefaultMessageVisitor;
    use tidefix_core::types::Timestamp;

    const NOW: u64 = 1_700_000_000_000;

    fn session() -> (Session, FixedClock, Arc<MemoryStore>) {
        let config = SessionConfigBuilder::new()
            .sender_comp_id("initiator")
            .target_comp_id("OPENFIX")
            .heartbeat_interval(Duration::from_secs(1))
            .build()
            .unwrap();
        let clock = FixedClock::new(Timestamp::from_millis(NOW));
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(config, store.clone(), Arc::new(clock.clone())).unwrap();
        (session, clock, store)
    }

    fn inbound(kind: MessageKind, seq: u64, build: impl FnOnce(&mut Message)) -> Vec<u8> {
        let mut message = Message::new(kind);
        build(&mut message);
        let header = message.header_mut();
        header.head_mut().set(BEGIN_STRING, "FIX.4.2").unwrap();
        header
            .fields_mut()
            .set(SENDER_COMP_ID, "OPENFIX")
            .unwrap()
            .set(TARGET_COMP_ID, "initiator")
            .unwrap()
            .set(MSG_SEQ_NUM, seq)
            .unwrap()
            .set(SENDING_TIME, Timestamp::from_millis(NOW))
            .unwrap();
        message.format().unwrap().to_vec()
    }

    fn logon(seq: u64) -> Vec<u8> {
        inbound(MessageKind::Logon, seq, |m| {
            m.set(ENCRYPT_METHOD, EncryptMethod::None)
                .unwrap()
                .set(HEART_BT_INT, 1u64)
                .unwrap();
        })
    }

    fn sent_kinds(conn: &RecordingConnection) -> Vec<MessageKind> {
        conn.sent()
            .iter()
            .map(|raw| Parser::new().decode(raw).unwrap().kind())
            .collect()
    }

    #[test]
    fn test_send_stamps_and_increments() {
        let (mut session, _, _) = session();
        let mut conn = RecordingConnection::new();
        session.heartbeat(&mut conn, None).unwrap();
        session.heartbeat(&mut conn, None).unwrap();
        assert_eq!(session.outgoing_seq(), SeqNum::new(3));

        let sent = Parser::new().decode(&conn.sent()[1]).unwrap();
        assert_eq!(sent.seq_num(), Some(SeqNum::new(2)));
        assert_eq!(sent.header().sender_comp_id(), Some("initiator"));
        assert_eq!(sent.header().target_comp_id(), Some("OPENFIX"));
        assert_eq!(sent.header().sending_time(), Some(Timestamp::from_millis(NOW)));
    }

    #[test]
    fn test_failed_send_keeps_counter() {
        let (mut session, _, _) = session();
        let mut conn = RecordingConnection::new();
        conn.close();
        assert!(session.heartbeat(&mut conn, None).is_err());
        assert_eq!(session.outgoing_seq(), SeqNum::new(1));
    }

    #[test]
    fn test_logon_exchange() {
        let (mut session, _, store) = session();
        let mut conn = RecordingConnection::new();
        session.logon(&mut conn).unwrap();
        assert_eq!(session.state(), SessionState::LoggingOn);
        assert!(session.logon(&mut conn).is_err());

        session
            .receive(&mut conn, &logon(1), &mut DefaultMessageVisitor)
            .unwrap();
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.incoming_seq(), SeqNum::new(2));
        assert_eq!(sent_kinds(&conn), vec![MessageKind::Logon]);
        assert_eq!(
            store.load(session.session_id()).unwrap(),
            Some(tidefix_store::SequenceState::new(SeqNum::new(2), SeqNum::new(2)))
        );
    }

    #[test]
    fn test_acceptor_answers_logon() {
        let (mut session, _, _) = session();
        let mut conn = RecordingConnection::new();
        session
            .receive(&mut conn, &logon(1), &mut DefaultMessageVisitor)
            .unwrap();
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(sent_kinds(&conn), vec![MessageKind::Logon]);
    }

    #[test]
    fn test_garbled_input_changes_nothing() {
        let (mut session, _, _) = session();
        let mut conn = RecordingConnection::new();
        session
            .receive(&mut conn, b"8=FIX.4.2\x019=5\x0135=0\x0110=000\x01", &mut DefaultMessageVisitor)
            .unwrap();
        assert_eq!(session.incoming_seq(), SeqNum::new(1));
        assert!(conn.sent().is_empty());
    }

    #[test]
    fn test_keep_alive_escalates() {
        let (mut session, _, _) = session();
        let mut conn = RecordingConnection::new();
        session
            .receive(&mut conn, &logon(1), &mut DefaultMessageVisitor)
            .unwrap();
        conn.take_sent();

        session.keep_alive(&mut conn).unwrap();
        session.keep_alive(&mut conn).unwrap();
        session.keep_alive(&mut conn).unwrap();
        assert_eq!(
            sent_kinds(&conn),
            vec![MessageKind::Heartbeat, MessageKind::TestRequest, MessageKind::Logout]
        );
        assert!(conn.is_closed());
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test]
    fn test_sequence_reset_moves_outgoing() {
        let (mut session, _, store) = session();
        let mut conn = RecordingConnection::new();
        session.sequence_reset(&mut conn, SeqNum::new(10)).unwrap();
        assert_eq!(session.outgoing_seq(), SeqNum::new(10));

        let sent = Parser::new().decode(&conn.sent()[0]).unwrap();
        assert_eq!(sent.seq_num(), Some(SeqNum::new(1)));
        assert!(!sent.body().flag(GAP_FILL_FLAG));
        assert_eq!(
            store.load(session.session_id()).unwrap().map(|s| s.outgoing),
            Some(SeqNum::new(10))
        );
    }

    #[test]
    fn test_reset_on_logon() {
        let config = SessionConfigBuilder::new()
            .sender_comp_id("initiator")
            .target_comp_id("OPENFIX")
            .reset_on_logon(true)
            .build()
            .unwrap();
        let store = Arc::new(MemoryStore::with_state(
            &config.session_id(),
            tidefix_store::SequenceState::new(SeqNum::new(7), SeqNum::new(9)),
        ));
        let clock = FixedClock::new(Timestamp::from_millis(NOW));
        let mut session = Session::new(config, store, Arc::new(clock)).unwrap();
        assert_eq!(session.outgoing_seq(), SeqNum::new(9));

        let mut conn = RecordingConnection::new();
        session.logon(&mut conn).unwrap();
        let sent = Parser::new().decode(&conn.sent()[0]).unwrap();
        assert_eq!(sent.seq_num(), Some(SeqNum::new(1)));
        assert!(sent.body().flag(RESET_SEQ_NUM_FLAG));
        assert_eq!(session.incoming_seq(), SeqNum::new(1));
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Session conformance scenarios.
//!
//! Each test drives an initiator session with hand-built frames from the
//! counterparty and checks what the session sent back and where its
//! counters ended up.

use std::sync::Arc;
use std::time::Duration;
use tidefix_core::field::FixEnum;
use tidefix_core::types::{BusinessRejectReason, SeqNum, SessionRejectReason, Timestamp};
use tidefix_core::MsgType;
use tidefix_dictionary::tags::*;
use tidefix_session::{
    Connection, FixedClock, RecordingConnection, Session, SessionConfigBuilder, SessionState,
};
use tidefix_store::{MemoryStore, SequenceState, SessionStore};
use tidefix_tagvalue::{calculate_checksum, Message, Parser};

const NOW_MILLIS: u64 = 1_700_000_000_000;

fn now() -> Timestamp {
    Timestamp::from_millis(NOW_MILLIS)
}

/// Builds a frame as the counterparty would send it.
struct RawMessage {
    begin_string: String,
    msg_type: String,
    header: Vec<(u32, String)>,
    body: Vec<(u32, String)>,
}

impl RawMessage {
    fn new(msg_type: &str, seq: u64) -> Self {
        Self {
            begin_string: "FIX.4.2".to_string(),
            msg_type: msg_type.to_string(),
            header: vec![
                (49, "OPENFIX".to_string()),
                (56, "initiator".to_string()),
                (34, seq.to_string()),
                (52, now().format_fix().to_string()),
            ],
            body: Vec::new(),
        }
    }

    fn logon(seq: u64) -> Self {
        Self::new("A", seq).field(98, "0").field(108, "1")
    }

    fn heartbeat(seq: u64) -> Self {
        Self::new("0", seq)
    }

    fn gap_fill(seq: u64, new_seq_no: u64) -> Self {
        Self::new("4", seq)
            .field(123, "Y")
            .field(36, &new_seq_no.to_string())
    }

    fn reset(seq: u64, new_seq_no: u64) -> Self {
        Self::new("4", seq).field(36, &new_seq_no.to_string())
    }

    fn begin_string(mut self, value: &str) -> Self {
        self.begin_string = value.to_string();
        self
    }

    fn header_field(mut self, tag: u32, value: &str) -> Self {
        match self.header.iter_mut().find(|(t, _)| *t == tag) {
            Some(field) => field.1 = value.to_string(),
            None => self.header.push((tag, value.to_string())),
        }
        self
    }

    fn poss_dup(self, orig_sending_time: Option<Timestamp>) -> Self {
        let message = self.header_field(43, "Y");
        match orig_sending_time {
            Some(orig) => message.header_field(122, orig.format_fix().as_str()),
            None => message,
        }
    }

    fn field(mut self, tag: u32, value: &str) -> Self {
        self.body.push((tag, value.to_string()));
        self
    }

    fn body_text(&self) -> String {
        let mut text = format!("35={}\x01", self.msg_type);
        for (tag, value) in self.header.iter().chain(self.body.iter()) {
            text.push_str(&format!("{tag}={value}\x01"));
        }
        text
    }

    fn build(&self) -> Vec<u8> {
        let body = self.body_text();
        frame(&format!("8={}\x019={}\x01{}", self.begin_string, body.len(), body))
    }
}

/// Appends a correct CheckSum to `head_and_body`.
fn frame(head_and_body: &str) -> Vec<u8> {
    let mut out = head_and_body.as_bytes().to_vec();
    let checksum = calculate_checksum(&out);
    out.extend_from_slice(format!("10={checksum:03}\x01").as_bytes());
    out
}

struct Harness {
    session: Session,
    conn: RecordingConnection,
    clock: FixedClock,
    store: Arc<MemoryStore>,
    app: Vec<Message>,
}

impl Harness {
    fn new() -> Self {
        let config = SessionConfigBuilder::new()
            .sender_comp_id("initiator")
            .target_comp_id("OPENFIX")
            .heartbeat_interval(Duration::from_secs(1))
            .build()
            .unwrap();
        let clock = FixedClock::new(now());
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(config, store.clone(), Arc::new(clock.clone())).unwrap();
        Self {
            session,
            conn: RecordingConnection::new(),
            clock,
            store,
            app: Vec::new(),
        }
    }

    /// An initiator that has completed logon: incoming 2, outgoing 2.
    fn logged_on() -> Self {
        let mut harness = Self::new();
        harness.session.logon(&mut harness.conn).unwrap();
        harness.receive(RawMessage::logon(1));
        assert_eq!(harness.session.state(), SessionState::Active);
        harness.conn.take_sent();
        harness
    }

    fn receive(&mut self, message: RawMessage) {
        self.receive_raw(&message.build());
    }

    fn receive_raw(&mut self, raw: &[u8]) {
        self.session
            .receive(&mut self.conn, raw, &mut self.app)
            .unwrap();
    }

    fn sent(&mut self) -> Vec<Message> {
        self.conn
            .take_sent()
            .iter()
            .map(|raw| Parser::new().decode(raw).unwrap())
            .collect()
    }

    fn sent_types(&mut self) -> Vec<MsgType> {
        self.sent().iter().map(Message::msg_type).collect()
    }

    fn incoming(&self) -> u64 {
        self.session.incoming_seq().value()
    }
}

fn reject_reason(message: &Message) -> SessionRejectReason {
    assert_eq!(message.msg_type(), MsgType::Reject);
    message.body().get_enum(SESSION_REJECT_REASON).unwrap()
}

fn assert_rejected(harness: &mut Harness, reason: SessionRejectReason, ref_tag: Option<i64>) {
    let sent = harness.sent();
    assert_eq!(sent.len(), 1, "expected exactly one Reject, got {sent:?}");
    assert_eq!(reject_reason(&sent[0]), reason);
    assert_eq!(sent[0].body().get_int(REF_TAG_ID).ok(), ref_tag);
    assert!(!harness.conn.is_closed());
}

fn assert_logged_out(harness: &mut Harness) {
    assert_eq!(harness.sent_types().last(), Some(&MsgType::Logout));
    assert!(harness.conn.is_closed());
    assert_eq!(harness.session.state(), SessionState::Disconnected);
}

// -------------------------------------------------------------------------
// Logon
// -------------------------------------------------------------------------

#[test]
fn logon_accepted_at_expected_seq() {
    let mut h = Harness::new();
    h.session.logon(&mut h.conn).unwrap();
    let logon = &h.sent()[0];
    assert_eq!(logon.msg_type(), MsgType::Logon);
    assert_eq!(logon.body().get_int(HEART_BT_INT).unwrap(), 1);
    assert_eq!(logon.body().get_str(ENCRYPT_METHOD).unwrap(), "0");

    h.receive(RawMessage::logon(1));
    assert_eq!(h.session.state(), SessionState::Active);
    assert_eq!(h.incoming(), 2);
    assert!(h.sent().is_empty());
}

#[test]
fn logon_with_seq_too_high_requests_resend() {
    let mut h = Harness::new();
    h.session.logon(&mut h.conn).unwrap();
    h.conn.take_sent();

    h.receive(RawMessage::logon(2));
    assert_eq!(h.session.state(), SessionState::Active);
    let sent = h.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].msg_type(), MsgType::ResendRequest);
    assert_eq!(sent[0].body().get_int(BEGIN_SEQ_NO).unwrap(), 1);
    assert_eq!(sent[0].body().get_int(END_SEQ_NO).unwrap(), 0);
    assert_eq!(h.incoming(), 1);
}

#[test]
fn invalid_logon_is_answered_with_logout() {
    let mut h = Harness::new();
    h.session.logon(&mut h.conn).unwrap();
    h.conn.take_sent();

    h.receive(RawMessage::new("A", 1).field(108, "1"));
    assert_logged_out(&mut h);
}

#[test]
fn first_message_other_than_logon_ends_session() {
    let mut h = Harness::new();
    h.session.logon(&mut h.conn).unwrap();
    h.conn.take_sent();

    h.receive(RawMessage::heartbeat(1));
    assert_logged_out(&mut h);
}

#[test]
fn acceptor_answers_logon_and_adopts_interval() {
    let mut h = Harness::new();
    h.receive(RawMessage::new("A", 1).field(98, "0").field(108, "5"));

    let sent = h.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].msg_type(), MsgType::Logon);
    assert_eq!(sent[0].body().get_int(HEART_BT_INT).unwrap(), 5);
    assert_eq!(h.session.heartbeat_interval(), Duration::from_secs(5));
    assert_eq!(h.session.state(), SessionState::Active);
}

#[test]
fn logon_persists_counters() {
    let h = Harness::logged_on();
    assert_eq!(
        h.store.load(h.session.session_id()).unwrap(),
        Some(SequenceState::new(SeqNum::new(2), SeqNum::new(2)))
    );
}

// -------------------------------------------------------------------------
// Standard header
// -------------------------------------------------------------------------

#[test]
fn msg_seq_num_as_expected() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(2));
    assert_eq!(h.incoming(), 3);
    assert!(h.sent().is_empty());
}

#[test]
fn msg_seq_num_higher_than_expected() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(3));
    let sent = h.sent();
    assert_eq!(sent[0].msg_type(), MsgType::ResendRequest);
    assert_eq!(sent[0].body().get_int(BEGIN_SEQ_NO).unwrap(), 2);
    assert_eq!(h.incoming(), 2);
}

#[test]
fn msg_seq_num_lower_than_expected_without_poss_dup() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(1));
    assert_logged_out(&mut h);
    assert_eq!(h.incoming(), 2);
}

#[test]
fn garbled_message_is_ignored() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(2).begin_string(""));
    assert_eq!(h.incoming(), 2);
    assert!(h.sent().is_empty());

    h.receive(RawMessage::new("1", 2).field(112, "12345678"));
    let sent = h.sent();
    assert_eq!(sent[0].msg_type(), MsgType::Heartbeat);
    assert_eq!(sent[0].body().get_str(TEST_REQ_ID).unwrap(), "12345678");
    assert_eq!(h.incoming(), 3);
}

#[test]
fn poss_dup_below_expected_is_ignored() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(2));
    h.receive(
        RawMessage::heartbeat(2).poss_dup(Some(now().minus(Duration::from_secs(60)))),
    );
    assert_eq!(h.incoming(), 3);
    assert!(h.sent().is_empty());

    h.receive(RawMessage::new("5", 3));
    assert_logged_out(&mut h);
}

#[test]
fn orig_sending_time_after_sending_time_is_rejected() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(2));
    h.receive(
        RawMessage::heartbeat(3).poss_dup(Some(now().plus(Duration::from_secs(60)))),
    );
    assert_rejected(
        &mut h,
        SessionRejectReason::SendingTimeAccuracyProblem,
        Some(122),
    );
    assert_eq!(h.incoming(), 4);
}

#[test]
fn poss_dup_without_orig_sending_time_is_rejected() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(2));
    h.receive(RawMessage::heartbeat(3).poss_dup(None));
    assert_rejected(&mut h, SessionRejectReason::RequiredTagMissing, Some(122));
    assert_eq!(h.incoming(), 4);
}

#[test]
fn begin_string_mismatch_ends_session() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(2).begin_string("FIX.4.4"));
    assert_logged_out(&mut h);
}

#[test]
fn sender_comp_id_mismatch() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(2).header_field(49, "SOMEONE"));
    let sent = h.sent();
    assert_eq!(reject_reason(&sent[0]), SessionRejectReason::CompIdProblem);
    assert_eq!(sent[0].body().get_int(REF_TAG_ID).unwrap(), 49);
    assert_eq!(sent[1].msg_type(), MsgType::Logout);
    assert!(h.conn.is_closed());
    assert_eq!(h.incoming(), 3);
}

#[test]
fn target_comp_id_mismatch() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(2).header_field(56, "SOMEONE"));
    let sent = h.sent();
    assert_eq!(reject_reason(&sent[0]), SessionRejectReason::CompIdProblem);
    assert_eq!(sent[0].body().get_int(REF_TAG_ID).unwrap(), 56);
    assert_eq!(sent[1].msg_type(), MsgType::Logout);
    assert_eq!(h.incoming(), 3);
}

#[test]
fn body_length_incorrect_is_garbled() {
    let mut h = Harness::logged_on();
    let message = RawMessage::heartbeat(2);
    let body = message.body_text();
    h.receive_raw(&frame(&format!("8=FIX.4.2\x019={}\x01{}", body.len() + 5, body)));
    assert_eq!(h.incoming(), 2);
    assert!(h.sent().is_empty());
}

#[test]
fn sending_time_outside_window() {
    let mut h = Harness::logged_on();
    h.clock.advance(Duration::from_secs(3 * 60));
    h.receive(RawMessage::heartbeat(2));
    let sent = h.sent();
    assert_eq!(
        reject_reason(&sent[0]),
        SessionRejectReason::SendingTimeAccuracyProblem
    );
    assert_eq!(sent[1].msg_type(), MsgType::Logout);
    assert!(h.conn.is_closed());
    assert_eq!(h.incoming(), 3);
}

#[test]
fn sending_time_just_inside_window() {
    let mut h = Harness::logged_on();
    h.clock.advance(Duration::from_secs(119));
    h.receive(RawMessage::heartbeat(2));
    assert!(h.sent().is_empty());
    assert_eq!(h.incoming(), 3);
}

#[test]
fn invalid_msg_type_is_rejected() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::new("Z9", 2));
    assert_rejected(&mut h, SessionRejectReason::InvalidMsgType, Some(35));
    assert_eq!(h.incoming(), 3);
}

#[test]
fn unsupported_msg_type_gets_business_reject() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::new("6", 2));
    let sent = h.sent();
    assert_eq!(sent[0].msg_type(), MsgType::BusinessMessageReject);
    assert_eq!(
        sent[0]
            .body()
            .get_enum::<BusinessRejectReason>(BUSINESS_REJECT_REASON)
            .unwrap(),
        BusinessRejectReason::UnsupportedMessageType
    );
    assert_eq!(sent[0].body().get_str(REF_MSG_TYPE).unwrap(), "6");
    assert_eq!(h.incoming(), 3);
}

#[test]
fn head_fields_out_of_place_are_garbled() {
    let mut h = Harness::logged_on();
    let body = RawMessage::heartbeat(2).body_text();
    h.receive_raw(&frame(&format!("9={}\x018=FIX.4.2\x01{}", body.len(), body)));

    let rest = body.trim_start_matches("35=0\x01");
    let swapped = format!("49=OPENFIX\x0135=0\x01{}", rest.trim_start_matches("49=OPENFIX\x01"));
    h.receive_raw(&frame(&format!("8=FIX.4.2\x019={}\x01{}", swapped.len(), swapped)));

    assert_eq!(h.incoming(), 2);
    assert!(h.sent().is_empty());
}

// -------------------------------------------------------------------------
// CheckSum
// -------------------------------------------------------------------------

#[test]
fn invalid_checksum_is_garbled() {
    let mut h = Harness::logged_on();
    let mut raw = RawMessage::heartbeat(2).build();
    let len = raw.len();
    raw[len - 2] = if raw[len - 2] == b'0' { b'1' } else { b'0' };
    h.receive_raw(&raw);
    assert_eq!(h.incoming(), 2);
    assert!(h.sent().is_empty());
}

#[test]
fn checksum_not_three_digits_is_garbled() {
    let mut h = Harness::logged_on();
    let mut raw = RawMessage::heartbeat(2).build();
    let len = raw.len();
    raw.remove(len - 4);
    h.receive_raw(&raw);
    assert_eq!(h.incoming(), 2);
    assert!(h.sent().is_empty());
}

#[test]
fn checksum_not_delimited_is_garbled() {
    let mut h = Harness::logged_on();
    let mut raw = RawMessage::heartbeat(2).build();
    raw.pop();
    h.receive_raw(&raw);
    assert_eq!(h.incoming(), 2);

    h.receive(RawMessage::heartbeat(2));
    assert_eq!(h.incoming(), 3);
}

// -------------------------------------------------------------------------
// Heartbeat, TestRequest and keep-alive
// -------------------------------------------------------------------------

#[test]
fn test_request_is_answered_with_heartbeat() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::new("1", 2).field(112, "PING"));
    let sent = h.sent();
    assert_eq!(sent[0].msg_type(), MsgType::Heartbeat);
    assert_eq!(sent[0].body().get_str(TEST_REQ_ID).unwrap(), "PING");
}

#[test]
fn idle_session_escalates_to_logout() {
    let mut h = Harness::logged_on();
    h.session.keep_alive(&mut h.conn).unwrap();
    let test_req_id = {
        h.session.keep_alive(&mut h.conn).unwrap();
        let sent = h.sent();
        assert_eq!(sent[0].msg_type(), MsgType::Heartbeat);
        assert_eq!(sent[1].msg_type(), MsgType::TestRequest);
        sent[1].body().get_str(TEST_REQ_ID).unwrap().to_owned()
    };

    h.receive(RawMessage::heartbeat(2).field(112, &test_req_id));
    h.session.keep_alive(&mut h.conn).unwrap();
    assert_eq!(h.sent_types(), vec![MsgType::Heartbeat]);

    h.session.keep_alive(&mut h.conn).unwrap();
    h.session.keep_alive(&mut h.conn).unwrap();
    assert_logged_out(&mut h);
}

#[test]
fn heartbeat_without_test_req_id_answers_test_request() {
    let mut h = Harness::logged_on();
    h.session.keep_alive(&mut h.conn).unwrap();
    h.session.keep_alive(&mut h.conn).unwrap();
    assert_eq!(h.sent_types(), vec![MsgType::Heartbeat, MsgType::TestRequest]);

    h.receive(RawMessage::heartbeat(2));
    h.receive(RawMessage::heartbeat(3));
    h.session.keep_alive(&mut h.conn).unwrap();
    assert_eq!(h.sent_types(), vec![MsgType::Heartbeat]);
    assert!(!h.conn.is_closed());
    assert_eq!(h.session.state(), SessionState::Active);
}

#[test]
fn any_inbound_message_answers_test_request() {
    let mut h = Harness::logged_on();
    h.session.keep_alive(&mut h.conn).unwrap();
    h.session.keep_alive(&mut h.conn).unwrap();
    h.conn.take_sent();

    h.receive(RawMessage::new("3", 2).field(45, "1"));
    h.session.keep_alive(&mut h.conn).unwrap();
    assert_eq!(h.sent_types(), vec![MsgType::Heartbeat]);
    assert!(!h.conn.is_closed());
}

#[test]
fn local_reject_and_resend_request() {
    let mut h = Harness::logged_on();
    h.session
        .reject(&mut h.conn, SeqNum::new(7), SessionRejectReason::Other, "not today")
        .unwrap();
    h.session
        .resend_request(&mut h.conn, SeqNum::new(1), SeqNum::new(0))
        .unwrap();

    let sent = h.sent();
    assert_eq!(reject_reason(&sent[0]), SessionRejectReason::Other);
    assert_eq!(sent[0].body().get_int(REF_SEQ_NUM).unwrap(), 7);
    assert_eq!(sent[0].body().get_str(TEXT).unwrap(), "not today");
    assert_eq!(sent[1].msg_type(), MsgType::ResendRequest);
    assert_eq!(sent[1].seq_num(), Some(SeqNum::new(3)));
    assert_eq!(h.session.outgoing_seq(), SeqNum::new(4));
}

#[test]
fn reject_is_logged_and_accepted() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::new("3", 2).field(45, "1").field(58, "bad"));
    assert!(h.sent().is_empty());
    assert_eq!(h.incoming(), 3);
}

// -------------------------------------------------------------------------
// ResendRequest and SequenceReset
// -------------------------------------------------------------------------

#[test]
fn resend_request_is_answered_with_gap_fill() {
    let mut h = Harness::logged_on();
    h.session.heartbeat(&mut h.conn, None).unwrap();
    h.session.heartbeat(&mut h.conn, None).unwrap();
    h.conn.take_sent();
    assert_eq!(h.session.outgoing_seq(), SeqNum::new(4));

    h.receive(RawMessage::new("2", 2).field(7, "1").field(16, "0"));
    let sent = h.sent();
    assert_eq!(sent.len(), 1);
    let gap_fill = &sent[0];
    assert_eq!(gap_fill.msg_type(), MsgType::SequenceReset);
    assert_eq!(gap_fill.seq_num(), Some(SeqNum::new(1)));
    assert!(gap_fill.is_poss_dup());
    assert!(gap_fill.header().orig_sending_time().is_some());
    assert!(gap_fill.body().flag(GAP_FILL_FLAG));
    assert_eq!(gap_fill.body().get_int(NEW_SEQ_NO).unwrap(), 4);
    assert_eq!(h.session.outgoing_seq(), SeqNum::new(4));
}

#[test]
fn resend_request_beyond_last_sent_is_ignored() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::new("2", 2).field(7, "5").field(16, "0"));
    assert!(h.sent().is_empty());
    assert_eq!(h.incoming(), 3);
}

#[test]
fn gap_fill_with_seq_above_expected_requests_resend() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::gap_fill(3, 5));
    assert_eq!(h.sent_types(), vec![MsgType::ResendRequest]);
    assert_eq!(h.incoming(), 2);
}

#[test]
fn gap_fill_at_expected_seq_advances() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::gap_fill(2, 5));
    assert!(h.sent().is_empty());
    assert_eq!(h.incoming(), 5);
}

#[test]
fn gap_fill_below_expected_with_poss_dup_is_ignored() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::gap_fill(1, 5).poss_dup(Some(now())));
    assert!(h.sent().is_empty());
    assert_eq!(h.incoming(), 2);
}

#[test]
fn gap_fill_below_expected_without_poss_dup_ends_session() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::gap_fill(1, 5));
    assert_logged_out(&mut h);
    assert_eq!(h.incoming(), 2);
}

#[test]
fn gap_fill_not_moving_forward_is_rejected() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::gap_fill(2, 2));
    assert_rejected(&mut h, SessionRejectReason::ValueIsIncorrect, Some(36));
    assert_eq!(h.incoming(), 2);
}

#[test]
fn reset_above_expected_moves_incoming() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::reset(2, 5));
    assert_eq!(h.incoming(), 5);

    h.receive(RawMessage::new("5", 5));
    assert_logged_out(&mut h);
    assert_eq!(h.incoming(), 6);
}

#[test]
fn reset_equal_to_expected_keeps_incoming() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::reset(2, 2));
    assert_eq!(h.incoming(), 2);
    assert!(h.sent().is_empty());

    h.receive(RawMessage::new("5", 2));
    assert_logged_out(&mut h);
    assert_eq!(h.incoming(), 3);
}

#[test]
fn reset_below_expected_is_rejected() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(2));
    h.receive(RawMessage::reset(3, 2));
    assert_rejected(&mut h, SessionRejectReason::ValueIsIncorrect, Some(36));
    assert_eq!(h.incoming(), 3);
}

#[test]
fn local_sequence_reset_then_logout() {
    let mut h = Harness::logged_on();
    h.session.heartbeat(&mut h.conn, None).unwrap();
    h.session
        .sequence_reset(&mut h.conn, SeqNum::new(10))
        .unwrap();
    let sent = h.sent();
    assert_eq!(sent[1].msg_type(), MsgType::SequenceReset);
    assert_eq!(sent[1].seq_num(), Some(SeqNum::new(3)));
    assert_eq!(sent[1].body().get_int(NEW_SEQ_NO).unwrap(), 10);

    h.receive(RawMessage::new("5", 2));
    let sent = h.sent();
    assert_eq!(sent[0].msg_type(), MsgType::Logout);
    assert_eq!(sent[0].seq_num(), Some(SeqNum::new(10)));
    assert_eq!(h.incoming(), 3);
    assert_eq!(h.session.outgoing_seq(), SeqNum::new(11));
}

// -------------------------------------------------------------------------
// Logout
// -------------------------------------------------------------------------

#[test]
fn solicited_logout_is_not_answered() {
    let mut h = Harness::logged_on();
    h.session.logout(&mut h.conn, None).unwrap();
    assert_eq!(h.session.state(), SessionState::LoggingOut);
    h.conn.take_sent();

    h.receive(RawMessage::new("5", 2));
    assert!(h.sent().is_empty());
    assert!(h.conn.is_closed());
    assert_eq!(h.session.state(), SessionState::Disconnected);
}

#[test]
fn unsolicited_logout_is_answered_and_saved() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::new("5", 2).field(58, "bye"));
    assert_logged_out(&mut h);
    assert_eq!(
        h.store.load(h.session.session_id()).unwrap(),
        Some(SequenceState::new(SeqNum::new(3), SeqNum::new(3)))
    );
}

// -------------------------------------------------------------------------
// Message content
// -------------------------------------------------------------------------

#[test]
fn undefined_tag() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(2).field(9999, "x"));
    assert_rejected(&mut h, SessionRejectReason::UndefinedTag, Some(9999));
    assert_eq!(h.incoming(), 3);
}

#[test]
fn required_field_missing() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::new("1", 2));
    assert_rejected(&mut h, SessionRejectReason::RequiredTagMissing, Some(112));
    assert_eq!(h.incoming(), 3);
}

#[test]
fn tag_not_defined_for_message_type() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(2).field(55, "IBM"));
    assert_rejected(
        &mut h,
        SessionRejectReason::TagNotDefinedForThisMessageType,
        Some(55),
    );
    assert_eq!(h.incoming(), 3);
}

#[test]
fn field_without_value() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::new("1", 2).field(112, ""));
    assert_rejected(
        &mut h,
        SessionRejectReason::TagSpecifiedWithoutAValue,
        Some(112),
    );
    assert_eq!(h.incoming(), 3);
}

#[test]
fn field_with_incorrect_value() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(2).header_field(43, "y"));
    assert_rejected(&mut h, SessionRejectReason::ValueIsIncorrect, Some(43));
    assert_eq!(h.incoming(), 3);
}

#[test]
fn field_with_incorrect_data_format() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::new("2", 2).field(7, "abc").field(16, "0"));
    assert_rejected(
        &mut h,
        SessionRejectReason::IncorrectDataFormatForValue,
        Some(7),
    );
    assert_eq!(h.incoming(), 3);
}

#[test]
fn standard_header_field_in_body() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::new("1", 2).field(112, "T").field(97, "N"));
    assert_rejected(
        &mut h,
        SessionRejectReason::TagSpecifiedOutOfRequiredOrder,
        Some(97),
    );
    assert_eq!(h.incoming(), 3);
}

#[test]
fn standard_trailer_field_before_body() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::heartbeat(2).field(10, "000").field(112, "T"));
    assert_rejected(
        &mut h,
        SessionRejectReason::TagSpecifiedOutOfRequiredOrder,
        Some(10),
    );
    assert_eq!(h.incoming(), 3);
}

#[test]
fn duplicate_field() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::new("1", 2).field(112, "A").field(112, "B"));
    assert_rejected(
        &mut h,
        SessionRejectReason::TagAppearsMoreThanOnce,
        Some(112),
    );
    assert_eq!(h.incoming(), 3);
}

fn allocation(seq: u64, orders: &[(u32, &str)], allocs: &[(u32, &str)]) -> RawMessage {
    let mut message = RawMessage::new("J", seq).field(70, "12807331319411").field(71, "0");
    for (tag, value) in orders {
        message = message.field(*tag, value);
    }
    message = message
        .field(54, "1")
        .field(55, "GOOG")
        .field(53, "1000")
        .field(6, "100")
        .field(75, "20100107");
    for (tag, value) in allocs {
        message = message.field(*tag, value);
    }
    message
}

#[test]
fn valid_allocation_reaches_application() {
    let mut h = Harness::logged_on();
    h.receive(allocation(
        2,
        &[(73, "1"), (11, "12345678")],
        &[(78, "1"), (79, "1234"), (80, "1000")],
    ));
    assert!(h.sent().is_empty());
    assert_eq!(h.app.len(), 1);
    assert_eq!(h.app[0].body().group(NO_ORDERS).len(), 1);
    assert_eq!(h.app[0].body().group(NO_ALLOCS)[0].get_str(ALLOC_ACCOUNT).unwrap(), "1234");
    assert_eq!(h.incoming(), 3);
}

#[test]
fn too_many_group_instances() {
    let mut h = Harness::logged_on();
    h.receive(allocation(2, &[(73, "1"), (11, "A"), (11, "B")], &[]));
    assert_rejected(&mut h, SessionRejectReason::IncorrectNumInGroupCount, Some(73));
    assert!(h.app.is_empty());
    assert_eq!(h.incoming(), 3);
}

#[test]
fn too_few_group_instances() {
    let mut h = Harness::logged_on();
    h.receive(allocation(2, &[(73, "2"), (11, "A")], &[]));
    assert_rejected(&mut h, SessionRejectReason::IncorrectNumInGroupCount, Some(73));
    assert_eq!(h.incoming(), 3);
}

#[test]
fn group_fields_out_of_order() {
    let mut h = Harness::logged_on();
    h.receive(allocation(
        2,
        &[(73, "1"), (11, "A")],
        &[(78, "1"), (80, "1000"), (79, "1234")],
    ));
    assert_rejected(
        &mut h,
        SessionRejectReason::RepeatingGroupFieldsOutOfOrder,
        Some(80),
    );
    assert_eq!(h.incoming(), 3);
}

#[test]
fn embedded_delimiter() {
    let mut h = Harness::logged_on();
    h.receive(RawMessage::new("1", 2).field(112, "abc\x01def"));
    assert_rejected(
        &mut h,
        SessionRejectReason::NonDataValueIncludesFieldDelimiter,
        Some(112),
    );
    assert_eq!(h.incoming(), 3);
}

#[test]
fn unavailable_application_gets_business_reject() {
    let mut h = Harness::logged_on();
    h.session.set_available(false);
    h.receive(
        RawMessage::new("D", 2)
            .field(11, "ORDER-1")
            .field(21, "1")
            .field(55, "GOOG")
            .field(54, "1")
            .field(60, now().format_fix().as_str())
            .field(38, "100")
            .field(40, "1"),
    );
    let sent = h.sent();
    assert_eq!(sent[0].msg_type(), MsgType::BusinessMessageReject);
    assert_eq!(
        sent[0].body().get_str(BUSINESS_REJECT_REASON).unwrap(),
        BusinessRejectReason::ApplicationNotAvailable.code()
    );
    assert!(h.app.is_empty());
    assert_eq!(h.incoming(), 3);
}

#[test]
fn business_reject_is_never_answered() {
    let mut h = Harness::logged_on();
    h.session.set_available(false);
    h.receive(RawMessage::new("j", 2).field(45, "1").field(372, "D").field(380, "4"));
    assert!(h.sent().is_empty());
    assert!(h.app.is_empty());
    assert_eq!(h.incoming(), 3);

    h.session.set_available(true);
    h.receive(RawMessage::new("j", 3).field(372, "D").field(380, "4"));
    assert!(h.sent().is_empty());
    assert_eq!(h.app.len(), 1);
    assert_eq!(h.app[0].msg_type(), MsgType::BusinessMessageReject);
    assert_eq!(h.incoming(), 4);
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Field definitions of the FIX 4.2 catalogue.
//!
//! Every tag is a process-wide constant. [`lookup`] answers whether a tag
//! number is known to the dictionary at all, which separates
//! "tag not defined for this message" from "undefined tag".

use crate::values::{
    AllocTransType, EncryptMethod, ExecTransType, ExecType, HandlInst, OrdStatus, OrdType, Side,
    TimeInForce,
};
use tidefix_core::{BusinessRejectReason, FieldKind, FixEnum, SessionRejectReason, Tag};

macro_rules! tags {
    ($( $(#[$meta:meta])* $ident:ident = $number:literal, $name:literal, $kind:expr; )+) => {
        $(
            $(#[$meta])*
            pub const $ident: Tag = Tag::new($number, $name, $kind);
        )+

        /// Every tag in the catalogue.
        pub static ALL: &[Tag] = &[$($ident),+];
    };
}

tags! {
    // Head and trailer
    /// BeginString (8).
    BEGIN_STRING = 8, "BeginString", FieldKind::String;
    /// BodyLength (9).
    BODY_LENGTH = 9, "BodyLength", FieldKind::Int;
    /// MsgType (35).
    MSG_TYPE = 35, "MsgType", FieldKind::String;
    /// CheckSum (10).
    CHECK_SUM = 10, "CheckSum", FieldKind::String;

    // Standard header
    /// SenderCompID (49).
    SENDER_COMP_ID = 49, "SenderCompID", FieldKind::String;
    /// TargetCompID (56).
    TARGET_COMP_ID = 56, "TargetCompID", FieldKind::String;
    /// OnBehalfOfCompID (115).
    ON_BEHALF_OF_COMP_ID = 115, "OnBehalfOfCompID", FieldKind::String;
    /// DeliverToCompID (128).
    DELIVER_TO_COMP_ID = 128, "DeliverToCompID", FieldKind::String;
    /// MsgSeqNum (34).
    MSG_SEQ_NUM = 34, "MsgSeqNum", FieldKind::Int;
    /// PossDupFlag (43).
    POSS_DUP_FLAG = 43, "PossDupFlag", FieldKind::Boolean;
    /// PossResend (97).
    POSS_RESEND = 97, "PossResend", FieldKind::Boolean;
    /// SendingTime (52).
    SENDING_TIME = 52, "SendingTime", FieldKind::UtcTimestamp;
    /// OrigSendingTime (122).
    ORIG_SENDING_TIME = 122, "OrigSendingTime", FieldKind::UtcTimestamp;

    // Session level
    /// TestReqID (112).
    TEST_REQ_ID = 112, "TestReqID", FieldKind::String;
    /// BeginSeqNo (7).
    BEGIN_SEQ_NO = 7, "BeginSeqNo", FieldKind::Int;
    /// EndSeqNo (16).
    END_SEQ_NO = 16, "EndSeqNo", FieldKind::Int;
    /// RefSeqNum (45).
    REF_SEQ_NUM = 45, "RefSeqNum", FieldKind::Int;
    /// RefTagID (371).
    REF_TAG_ID = 371, "RefTagID", FieldKind::Int;
    /// RefMsgType (372).
    REF_MSG_TYPE = 372, "RefMsgType", FieldKind::String;
    /// SessionRejectReason (373).
    SESSION_REJECT_REASON = 373, "SessionRejectReason", FieldKind::Enum(SessionRejectReason::CODES);
    /// Text (58).
    TEXT = 58, "Text", FieldKind::String;
    /// GapFillFlag (123).
    GAP_FILL_FLAG = 123, "GapFillFlag", FieldKind::Boolean;
    /// NewSeqNo (36).
    NEW_SEQ_NO = 36, "NewSeqNo", FieldKind::Int;
    /// EncryptMethod (98).
    ENCRYPT_METHOD = 98, "EncryptMethod", FieldKind::Enum(EncryptMethod::CODES);
    /// HeartBtInt (108).
    HEART_BT_INT = 108, "HeartBtInt", FieldKind::Int;
    /// ResetSeqNumFlag (141).
    RESET_SEQ_NUM_FLAG = 141, "ResetSeqNumFlag", FieldKind::Boolean;
    /// BusinessRejectRefID (379).
    BUSINESS_REJECT_REF_ID = 379, "BusinessRejectRefID", FieldKind::String;
    /// BusinessRejectReason (380).
    BUSINESS_REJECT_REASON = 380, "BusinessRejectReason", FieldKind::Enum(BusinessRejectReason::CODES);

    // Orders and executions
    /// OrderID (37).
    ORDER_ID = 37, "OrderID", FieldKind::String;
    /// ClOrdID (11).
    CL_ORD_ID = 11, "ClOrdID", FieldKind::String;
    /// OrigClOrdID (41).
    ORIG_CL_ORD_ID = 41, "OrigClOrdID", FieldKind::String;
    /// ExecID (17).
    EXEC_ID = 17, "ExecID", FieldKind::String;
    /// ExecTransType (20).
    EXEC_TRANS_TYPE = 20, "ExecTransType", FieldKind::Enum(ExecTransType::CODES);
    /// ExecType (150).
    EXEC_TYPE = 150, "ExecType", FieldKind::Enum(ExecType::CODES);
    /// OrdStatus (39).
    ORD_STATUS = 39, "OrdStatus", FieldKind::Enum(OrdStatus::CODES);
    /// OrdRejReason (103).
    ORD_REJ_REASON = 103, "OrdRejReason", FieldKind::Int;
    /// ExecRestatementReason (378).
    EXEC_RESTATEMENT_REASON = 378, "ExecRestatementReason", FieldKind::Int;
    /// Symbol (55).
    SYMBOL = 55, "Symbol", FieldKind::String;
    /// SecurityType (167).
    SECURITY_TYPE = 167, "SecurityType", FieldKind::String;
    /// MaturityMonthYear (200).
    MATURITY_MONTH_YEAR = 200, "MaturityMonthYear", FieldKind::MonthYear;
    /// Side (54).
    SIDE = 54, "Side", FieldKind::Enum(Side::CODES);
    /// OrderQty (38).
    ORDER_QTY = 38, "OrderQty", FieldKind::Float;
    /// LastShares (32).
    LAST_SHARES = 32, "LastShares", FieldKind::Float;
    /// LastPx (31).
    LAST_PX = 31, "LastPx", FieldKind::Float;
    /// LeavesQty (151).
    LEAVES_QTY = 151, "LeavesQty", FieldKind::Float;
    /// OrdType (40).
    ORD_TYPE = 40, "OrdType", FieldKind::Enum(OrdType::CODES);
    /// Price (44).
    PRICE = 44, "Price", FieldKind::Float;
    /// TimeInForce (59).
    TIME_IN_FORCE = 59, "TimeInForce", FieldKind::Enum(TimeInForce::CODES);
    /// CumQty (14).
    CUM_QTY = 14, "CumQty", FieldKind::Float;
    /// AvgPx (6).
    AVG_PX = 6, "AvgPx", FieldKind::Float;
    /// TransactTime (60).
    TRANSACT_TIME = 60, "TransactTime", FieldKind::UtcTimestamp;
    /// ExDestination (100).
    EX_DESTINATION = 100, "ExDestination", FieldKind::String;
    /// LastMkt (30).
    LAST_MKT = 30, "LastMkt", FieldKind::String;
    /// Currency (15).
    CURRENCY = 15, "Currency", FieldKind::String;
    /// HandlInst (21).
    HANDL_INST = 21, "HandlInst", FieldKind::Enum(HandlInst::CODES);

    // Allocations
    /// AllocID (70).
    ALLOC_ID = 70, "AllocID", FieldKind::String;
    /// AllocTransType (71).
    ALLOC_TRANS_TYPE = 71, "AllocTransType", FieldKind::Enum(AllocTransType::CODES);
    /// NoOrders (73).
    NO_ORDERS = 73, "NoOrders", FieldKind::NumInGroup;
    /// Shares (53).
    SHARES = 53, "Shares", FieldKind::Float;
    /// TradeDate (75).
    TRADE_DATE = 75, "TradeDate", FieldKind::LocalMktDate;
    /// NoAllocs (78).
    NO_ALLOCS = 78, "NoAllocs", FieldKind::NumInGroup;
    /// AllocAccount (79).
    ALLOC_ACCOUNT = 79, "AllocAccount", FieldKind::String;
    /// AllocShares (80).
    ALLOC_SHARES = 80, "AllocShares", FieldKind::Float;
}

/// Looks up a tag definition by number.
#[must_use]
pub fn lookup(number: u32) -> Option<Tag> {
    ALL.iter().copied().find(|tag| tag.number() == number)
}

/// Returns true for the head, standard header and trailer tags.
#[must_use]
pub fn is_header_or_trailer(number: u32) -> bool {
    matches!(number, 8 | 9 | 35 | 10 | 49 | 56 | 115 | 128 | 34 | 43 | 97 | 52 | 122)
}

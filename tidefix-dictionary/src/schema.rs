/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message schemas of the FIX 4.2 profile.
//!
//! This module defines:
//! - [`HEAD_SCHEMA`]: BeginString, BodyLength and MsgType in their fixed positions
//! - [`HEADER_SCHEMA`]: the standard header
//! - one body schema per supported message type
//! - [`MessageKind`]: the closed set of supported message types
//!
//! Schemas are static tables shared by every message instance. Conditional
//! requirements are plain function pointers evaluated after parsing.

use crate::tags::*;
use crate::values::OrdType;
use tidefix_core::{FieldContainer, MsgType, Required, SchemaEntry};

/// Returns true when the container holds a PossDupFlag.
fn has_poss_dup(container: &FieldContainer) -> bool {
    container.has_value(POSS_DUP_FLAG.number())
}

/// Returns true when OrdType is LIMIT.
fn is_limit_order(container: &FieldContainer) -> bool {
    matches!(container.get_enum(ORD_TYPE), Ok(OrdType::Limit))
}

/// Head fields, always the first three fields of a message.
pub const HEAD_SCHEMA: &[SchemaEntry] = &[
    SchemaEntry::required(BEGIN_STRING),
    SchemaEntry::required(BODY_LENGTH),
    SchemaEntry::required(MSG_TYPE),
];

/// Standard header.
pub const HEADER_SCHEMA: &[SchemaEntry] = &[
    SchemaEntry::required(SENDER_COMP_ID),
    SchemaEntry::required(TARGET_COMP_ID),
    SchemaEntry::optional(ON_BEHALF_OF_COMP_ID),
    SchemaEntry::optional(DELIVER_TO_COMP_ID),
    SchemaEntry::required(MSG_SEQ_NUM),
    SchemaEntry::optional(POSS_DUP_FLAG),
    SchemaEntry::optional(POSS_RESEND),
    SchemaEntry::required(SENDING_TIME),
    SchemaEntry::conditional(ORIG_SENDING_TIME, has_poss_dup),
];

/// Heartbeat (0).
pub const HEARTBEAT: &[SchemaEntry] = &[SchemaEntry::optional(TEST_REQ_ID)];

/// TestRequest (1).
pub const TEST_REQUEST: &[SchemaEntry] = &[SchemaEntry::required(TEST_REQ_ID)];

/// ResendRequest (2).
pub const RESEND_REQUEST: &[SchemaEntry] = &[
    SchemaEntry::required(BEGIN_SEQ_NO),
    SchemaEntry::required(END_SEQ_NO),
];

/// Reject (3).
pub const REJECT: &[SchemaEntry] = &[
    SchemaEntry::required(REF_SEQ_NUM),
    SchemaEntry::optional(REF_TAG_ID),
    SchemaEntry::optional(REF_MSG_TYPE),
    SchemaEntry::optional(SESSION_REJECT_REASON),
    SchemaEntry::optional(TEXT),
];

/// SequenceReset (4).
pub const SEQUENCE_RESET: &[SchemaEntry] = &[
    SchemaEntry::optional(GAP_FILL_FLAG),
    SchemaEntry::required(NEW_SEQ_NO),
];

/// Logout (5).
pub const LOGOUT: &[SchemaEntry] = &[SchemaEntry::optional(TEXT)];

/// Logon (A).
pub const LOGON: &[SchemaEntry] = &[
    SchemaEntry::required(ENCRYPT_METHOD),
    SchemaEntry::required(HEART_BT_INT),
    SchemaEntry::optional(RESET_SEQ_NUM_FLAG),
];

/// BusinessMessageReject (j).
pub const BUSINESS_MESSAGE_REJECT: &[SchemaEntry] = &[
    SchemaEntry::optional(REF_SEQ_NUM),
    SchemaEntry::required(REF_MSG_TYPE),
    SchemaEntry::optional(BUSINESS_REJECT_REF_ID),
    SchemaEntry::required(BUSINESS_REJECT_REASON),
    SchemaEntry::optional(TEXT),
];

/// ExecutionReport (8).
pub const EXECUTION_REPORT: &[SchemaEntry] = &[
    SchemaEntry::required(ORDER_ID),
    SchemaEntry::optional(CL_ORD_ID),
    SchemaEntry::optional(ORIG_CL_ORD_ID),
    SchemaEntry::required(EXEC_ID),
    SchemaEntry::required(EXEC_TRANS_TYPE),
    SchemaEntry::required(EXEC_TYPE),
    SchemaEntry::required(ORD_STATUS),
    SchemaEntry::optional(ORD_REJ_REASON),
    SchemaEntry::optional(EXEC_RESTATEMENT_REASON),
    SchemaEntry::required(SYMBOL),
    SchemaEntry::optional(SECURITY_TYPE),
    SchemaEntry::optional(MATURITY_MONTH_YEAR),
    SchemaEntry::required(SIDE),
    SchemaEntry::required(ORDER_QTY),
    SchemaEntry::optional(LAST_SHARES),
    SchemaEntry::optional(LAST_PX),
    SchemaEntry::required(LEAVES_QTY),
    SchemaEntry::optional(ORD_TYPE),
    SchemaEntry::conditional(PRICE, is_limit_order),
    SchemaEntry::optional(TIME_IN_FORCE),
    SchemaEntry::required(CUM_QTY),
    SchemaEntry::required(AVG_PX),
    SchemaEntry::optional(TRANSACT_TIME),
    SchemaEntry::optional(TEXT),
    SchemaEntry::optional(EX_DESTINATION),
    SchemaEntry::optional(LAST_MKT),
    SchemaEntry::optional(CURRENCY),
];

/// NewOrderSingle (D).
pub const NEW_ORDER_SINGLE: &[SchemaEntry] = &[
    SchemaEntry::required(CL_ORD_ID),
    SchemaEntry::required(HANDL_INST),
    SchemaEntry::required(SYMBOL),
    SchemaEntry::required(SIDE),
    SchemaEntry::required(TRANSACT_TIME),
    SchemaEntry::required(ORDER_QTY),
    SchemaEntry::required(ORD_TYPE),
    SchemaEntry::conditional(PRICE, is_limit_order),
    SchemaEntry::optional(TIME_IN_FORCE),
    SchemaEntry::optional(CURRENCY),
    SchemaEntry::optional(TEXT),
    SchemaEntry::optional(SECURITY_TYPE),
    SchemaEntry::optional(MATURITY_MONTH_YEAR),
];

/// OrderCancelRequest (F).
pub const ORDER_CANCEL_REQUEST: &[SchemaEntry] = &[
    SchemaEntry::required(ORIG_CL_ORD_ID),
    SchemaEntry::required(CL_ORD_ID),
    SchemaEntry::required(SYMBOL),
    SchemaEntry::required(SIDE),
    SchemaEntry::required(TRANSACT_TIME),
    SchemaEntry::required(ORDER_QTY),
];

/// OrderCancelReplaceRequest (G).
pub const ORDER_CANCEL_REPLACE_REQUEST: &[SchemaEntry] = &[
    SchemaEntry::required(ORIG_CL_ORD_ID),
    SchemaEntry::required(CL_ORD_ID),
    SchemaEntry::required(HANDL_INST),
    SchemaEntry::required(SYMBOL),
    SchemaEntry::optional(SECURITY_TYPE),
    SchemaEntry::optional(MATURITY_MONTH_YEAR),
    SchemaEntry::required(SIDE),
    SchemaEntry::required(TRANSACT_TIME),
    SchemaEntry::required(ORDER_QTY),
    SchemaEntry::required(ORD_TYPE),
    SchemaEntry::optional(CURRENCY),
    SchemaEntry::optional(PRICE),
];

/// Entry of the NoOrders group.
pub const ORDERS_GROUP: &[SchemaEntry] = &[SchemaEntry::required(CL_ORD_ID)];

/// Entry of the NoAllocs group.
pub const ALLOCS_GROUP: &[SchemaEntry] = &[
    SchemaEntry::required(ALLOC_ACCOUNT),
    SchemaEntry::optional(ALLOC_SHARES),
];

/// AllocationInstruction (J).
pub const ALLOCATION_INSTRUCTION: &[SchemaEntry] = &[
    SchemaEntry::required(ALLOC_ID),
    SchemaEntry::required(ALLOC_TRANS_TYPE),
    SchemaEntry::group(NO_ORDERS, Required::Yes, ORDERS_GROUP),
    SchemaEntry::required(SIDE),
    SchemaEntry::required(SYMBOL),
    SchemaEntry::required(SHARES),
    SchemaEntry::required(AVG_PX),
    SchemaEntry::required(TRADE_DATE),
    SchemaEntry::group(NO_ALLOCS, Required::No, ALLOCS_GROUP),
];

/// Message types with a schema in this profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Heartbeat (0).
    Heartbeat,
    /// TestRequest (1).
    TestRequest,
    /// ResendRequest (2).
    ResendRequest,
    /// Reject (3).
    Reject,
    /// SequenceReset (4).
    SequenceReset,
    /// Logout (5).
    Logout,
    /// Logon (A).
    Logon,
    /// BusinessMessageReject (j).
    BusinessMessageReject,
    /// ExecutionReport (8).
    ExecutionReport,
    /// NewOrderSingle (D).
    NewOrderSingle,
    /// OrderCancelRequest (F).
    OrderCancelRequest,
    /// OrderCancelReplaceRequest (G).
    OrderCancelReplaceRequest,
    /// AllocationInstruction (J).
    AllocationInstruction,
}

impl MessageKind {
    /// Every supported kind.
    pub const ALL: [Self; 13] = [
        Self::Heartbeat,
        Self::TestRequest,
        Self::ResendRequest,
        Self::Reject,
        Self::SequenceReset,
        Self::Logout,
        Self::Logon,
        Self::BusinessMessageReject,
        Self::ExecutionReport,
        Self::NewOrderSingle,
        Self::OrderCancelRequest,
        Self::OrderCancelReplaceRequest,
        Self::AllocationInstruction,
    ];

    /// Resolves a MsgType to its kind; `None` when this profile has no schema for it.
    #[must_use]
    pub const fn from_msg_type(msg_type: &MsgType) -> Option<Self> {
        Some(match msg_type {
            MsgType::Heartbeat => Self::Heartbeat,
            MsgType::TestRequest => Self::TestRequest,
            MsgType::ResendRequest => Self::ResendRequest,
            MsgType::Reject => Self::Reject,
            MsgType::SequenceReset => Self::SequenceReset,
            MsgType::Logout => Self::Logout,
            MsgType::Logon => Self::Logon,
            MsgType::BusinessMessageReject => Self::BusinessMessageReject,
            MsgType::ExecutionReport => Self::ExecutionReport,
            MsgType::NewOrderSingle => Self::NewOrderSingle,
            MsgType::OrderCancelRequest => Self::OrderCancelRequest,
            MsgType::OrderCancelReplaceRequest => Self::OrderCancelReplaceRequest,
            MsgType::AllocationInstruction => Self::AllocationInstruction,
            _ => return None,
        })
    }

    /// Returns the MsgType of this kind.
    #[must_use]
    pub fn msg_type(self) -> MsgType {
        match self {
            Self::Heartbeat => MsgType::Heartbeat,
            Self::TestRequest => MsgType::TestRequest,
            Self::ResendRequest => MsgType::ResendRequest,
            Self::Reject => MsgType::Reject,
            Self::SequenceReset => MsgType::SequenceReset,
            Self::Logout => MsgType::Logout,
            Self::Logon => MsgType::Logon,
            Self::BusinessMessageReject => MsgType::BusinessMessageReject,
            Self::ExecutionReport => MsgType::ExecutionReport,
            Self::NewOrderSingle => MsgType::NewOrderSingle,
            Self::OrderCancelRequest => MsgType::OrderCancelRequest,
            Self::OrderCancelReplaceRequest => MsgType::OrderCancelReplaceRequest,
            Self::AllocationInstruction => MsgType::AllocationInstruction,
        }
    }

    /// Returns the body schema.
    #[must_use]
    pub const fn body_schema(self) -> &'static [SchemaEntry] {
        match self {
            Self::Heartbeat => HEARTBEAT,
            Self::TestRequest => TEST_REQUEST,
            Self::ResendRequest => RESEND_REQUEST,
            Self::Reject => REJECT,
            Self::SequenceReset => SEQUENCE_RESET,
            Self::Logout => LOGOUT,
            Self::Logon => LOGON,
            Self::BusinessMessageReject => BUSINESS_MESSAGE_REJECT,
            Self::ExecutionReport => EXECUTION_REPORT,
            Self::NewOrderSingle => NEW_ORDER_SINGLE,
            Self::OrderCancelRequest => ORDER_CANCEL_REQUEST,
            Self::OrderCancelReplaceRequest => ORDER_CANCEL_REPLACE_REQUEST,
            Self::AllocationInstruction => ALLOCATION_INSTRUCTION,
        }
    }

    /// Returns true for session-level messages handled by the session itself.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        !matches!(
            self,
            Self::BusinessMessageReject
                | Self::ExecutionReport
                | Self::NewOrderSingle
                | Self::OrderCancelRequest
                | Self::OrderCancelReplaceRequest
                | Self::AllocationInstruction
        )
    }
}

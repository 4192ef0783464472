/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! The MsgType (tag 35) catalogue.
//!
//! A [`MsgType`] is either a message type the FIX protocol defines, or an
//! [`MsgType::Unknown`] code that no version of the protocol knows. Whether a
//! known type is actually supported is decided by the dictionary.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

macro_rules! msg_types {
    ($( $(#[$meta:meta])* $variant:ident = $code:literal, )+) => {
        /// FIX message types.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum MsgType {
            $( $(#[$meta])* $variant, )+
            /// A code that is not a FIX message type.
            Unknown(String),
        }

        impl MsgType {
            /// Returns the wire code of this message type.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $code, )+
                    Self::Unknown(code) => code,
                }
            }
        }

        impl FromStr for MsgType {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(match s {
                    $( $code => Self::$variant, )+
                    other => Self::Unknown(other.to_owned()),
                })
            }
        }
    };
}

msg_types! {
    /// Heartbeat (0).
    Heartbeat = "0",
    /// Test Request (1).
    TestRequest = "1",
    /// Resend Request (2).
    ResendRequest = "2",
    /// Reject (3).
    Reject = "3",
    /// Sequence Reset (4).
    SequenceReset = "4",
    /// Logout (5).
    Logout = "5",
    /// Indication of Interest (6).
    IndicationOfInterest = "6",
    /// Advertisement (7).
    Advertisement = "7",
    /// Execution Report (8).
    ExecutionReport = "8",
    /// Order Cancel Reject (9).
    OrderCancelReject = "9",
    /// Logon (A).
    Logon = "A",
    /// News (B).
    News = "B",
    /// Email (C).
    Email = "C",
    /// New Order Single (D).
    NewOrderSingle = "D",
    /// New Order List (E).
    NewOrderList = "E",
    /// Order Cancel Request (F).
    OrderCancelRequest = "F",
    /// Order Cancel/Replace Request (G).
    OrderCancelReplaceRequest = "G",
    /// Order Status Request (H).
    OrderStatusRequest = "H",
    /// Allocation Instruction (J).
    AllocationInstruction = "J",
    /// List Cancel Request (K).
    ListCancelRequest = "K",
    /// List Execute (L).
    ListExecute = "L",
    /// List Status Request (M).
    ListStatusRequest = "M",
    /// List Status (N).
    ListStatus = "N",
    /// Allocation Instruction Ack (P).
    AllocationInstructionAck = "P",
    /// Don't Know Trade (Q).
    DontKnowTrade = "Q",
    /// Quote Request (R).
    QuoteRequest = "R",
    /// Quote (S).
    Quote = "S",
    /// Settlement Instructions (T).
    SettlementInstructions = "T",
    /// Market Data Request (V).
    MarketDataRequest = "V",
    /// Market Data Snapshot Full Refresh (W).
    MarketDataSnapshotFullRefresh = "W",
    /// Market Data Incremental Refresh (X).
    MarketDataIncrementalRefresh = "X",
    /// Market Data Request Reject (Y).
    MarketDataRequestReject = "Y",
    /// Quote Cancel (Z).
    QuoteCancel = "Z",
    /// Quote Status Request (a).
    QuoteStatusRequest = "a",
    /// Mass Quote Acknowledgement (b).
    MassQuoteAcknowledgement = "b",
    /// Security Definition Request (c).
    SecurityDefinitionRequest = "c",
    /// Security Definition (d).
    SecurityDefinition = "d",
    /// Security Status Request (e).
    SecurityStatusRequest = "e",
    /// Security Status (f).
    SecurityStatus = "f",
    /// Trading Session Status Request (g).
    TradingSessionStatusRequest = "g",
    /// Trading Session Status (h).
    TradingSessionStatus = "h",
    /// Mass Quote (i).
    MassQuote = "i",
    /// Business Message Reject (j).
    BusinessMessageReject = "j",
    /// Bid Request (k).
    BidRequest = "k",
    /// Bid Response (l).
    BidResponse = "l",
    /// List Strike Price (m).
    ListStrikePrice = "m",
    /// XML Message (n).
    XmlMessage = "n",
    /// Registration Instructions (o).
    RegistrationInstructions = "o",
    /// Registration Instructions Response (p).
    RegistrationInstructionsResponse = "p",
    /// Order Mass Cancel Request (q).
    OrderMassCancelRequest = "q",
    /// Order Mass Cancel Report (r).
    OrderMassCancelReport = "r",
    /// New Order Cross (s).
    NewOrderCross = "s",
    /// Cross Order Cancel/Replace Request (t).
    CrossOrderCancelReplaceRequest = "t",
    /// Cross Order Cancel Request (u).
    CrossOrderCancelRequest = "u",
    /// Security Type Request (v).
    SecurityTypeRequest = "v",
    /// Security Types (w).
    SecurityTypes = "w",
    /// Security List Request (x).
    SecurityListRequest = "x",
    /// Security List (y).
    SecurityList = "y",
    /// Derivative Security List Request (z).
    DerivativeSecurityListRequest = "z",
    /// Derivative Security List (AA).
    DerivativeSecurityList = "AA",
    /// New Order Multileg (AB).
    NewOrderMultileg = "AB",
    /// Multileg Order Cancel/Replace (AC).
    MultilegOrderCancelReplace = "AC",
    /// Trade Capture Report Request (AD).
    TradeCaptureReportRequest = "AD",
    /// Trade Capture Report (AE).
    TradeCaptureReport = "AE",
    /// Order Mass Status Request (AF).
    OrderMassStatusRequest = "AF",
    /// Quote Request Reject (AG).
    QuoteRequestReject = "AG",
    /// RFQ Request (AH).
    RfqRequest = "AH",
    /// Quote Status Report (AI).
    QuoteStatusReport = "AI",
    /// Quote Response (AJ).
    QuoteResponse = "AJ",
    /// Confirmation (AK).
    Confirmation = "AK",
    /// Position Maintenance Request (AL).
    PositionMaintenanceRequest = "AL",
    /// Position Maintenance Report (AM).
    PositionMaintenanceReport = "AM",
    /// Request For Positions (AN).
    RequestForPositions = "AN",
    /// Request For Positions Ack (AO).
    RequestForPositionsAck = "AO",
    /// Position Report (AP).
    PositionReport = "AP",
}

impl MsgType {
    /// Returns true if the protocol defines this message type.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Returns true for session-level (administrative) messages.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(
            self,
            Self::Heartbeat
                | Self::TestRequest
                | Self::ResendRequest
                | Self::Reject
                | Self::SequenceReset
                | Self::Logout
                | Self::Logon
        )
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a wire code; never fails, unknown codes become [`MsgType::Unknown`].
impl From<&str> for MsgType {
    fn from(code: &str) -> Self {
        match code.parse() {
            Ok(msg_type) => msg_type,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msg_type_round_trip() {
        for code in ["0", "A", "8", "J", "P", "j", "AP"] {
            assert_eq!(MsgType::from(code).as_str(), code);
        }
    }

    #[test]
    fn test_msg_type_known() {
        assert!(MsgType::from("P").is_known());
        assert!(!MsgType::from("ZZ").is_known());
        assert_eq!(MsgType::from("ZZ"), MsgType::Unknown("ZZ".to_string()));
    }

    #[test]
    fn test_msg_type_is_admin() {
        assert!(MsgType::Logon.is_admin());
        assert!(MsgType::SequenceReset.is_admin());
        assert!(!MsgType::ExecutionReport.is_admin());
        assert!(!MsgType::BusinessMessageReject.is_admin());
    }

    #[test]
    fn test_msg_type_display() {
        assert_eq!(MsgType::NewOrderSingle.to_string(), "D");
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Enumerated field values of the FIX 4.2 catalogue.
//!
//! Each type implements [`FixEnum`], so it can be used both to declare the
//! closed code set of a [`Tag`](tidefix_core::Tag) and to read a typed value
//! back out of a container with `get_enum`.

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use tidefix_core::fix_enum;
use tidefix_core::{FieldValue, FixEnum};

/// Side (tag 54).
///
/// Discriminants are the ASCII byte of the wire code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
pub enum Side {
    /// Buy.
    Buy = b'1',
    /// Sell.
    Sell = b'2',
    /// Buy minus.
    BuyMinus = b'3',
    /// Sell plus.
    SellPlus = b'4',
    /// Sell short.
    SellShort = b'5',
    /// Sell short exempt.
    SellShortExempt = b'6',
    /// Undisclosed.
    Undisclosed = b'7',
    /// Cross (orders where counterparty is an exchange).
    Cross = b'8',
    /// Cross short.
    CrossShort = b'9',
}

impl Side {
    /// Creates a Side from its wire character.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        u8::try_from(c).ok().and_then(Self::from_u8)
    }

    /// Returns the wire character.
    #[must_use]
    pub fn as_char(self) -> char {
        self.to_u8().map_or('?', char::from)
    }
}

impl FixEnum for Side {
    const CODES: &'static [&'static str] = &["1", "2", "3", "4", "5", "6", "7", "8", "9"];

    fn from_code(code: &str) -> Option<Self> {
        match code.as_bytes() {
            [byte] => Self::from_u8(*byte),
            _ => None,
        }
    }

    fn code(self) -> &'static str {
        match self {
            Self::Buy => "1",
            Self::Sell => "2",
            Self::BuyMinus => "3",
            Self::SellPlus => "4",
            Self::SellShort => "5",
            Self::SellShortExempt => "6",
            Self::Undisclosed => "7",
            Self::Cross => "8",
            Self::CrossShort => "9",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<Side> for FieldValue {
    fn from(side: Side) -> Self {
        FieldValue::String(side.code().to_owned())
    }
}

fix_enum! {
    /// OrdType (tag 40).
    pub enum OrdType {
        /// Market.
        Market = "1",
        /// Limit.
        Limit = "2",
        /// Stop.
        Stop = "3",
        /// Stop limit.
        StopLimit = "4",
        /// Market on close.
        MarketOnClose = "5",
        /// With or without.
        WithOrWithout = "6",
        /// Limit or better.
        LimitOrBetter = "7",
        /// Limit with or without.
        LimitWithOrWithout = "8",
        /// On basis.
        OnBasis = "9",
        /// On close.
        OnClose = "A",
        /// Limit on close.
        LimitOnClose = "B",
        /// Forex market.
        ForexMarket = "C",
        /// Previously quoted.
        PreviouslyQuoted = "D",
        /// Previously indicated.
        PreviouslyIndicated = "E",
        /// Forex limit.
        ForexLimit = "F",
        /// Forex swap.
        ForexSwap = "G",
        /// Forex previously quoted.
        ForexPreviouslyQuoted = "H",
        /// Funari.
        Funari = "I",
        /// Pegged.
        Pegged = "P",
    }
}

fix_enum! {
    /// TimeInForce (tag 59).
    pub enum TimeInForce {
        /// Day.
        Day = "0",
        /// Good till cancel.
        GoodTillCancel = "1",
        /// At the opening.
        AtTheOpening = "2",
        /// Immediate or cancel.
        ImmediateOrCancel = "3",
        /// Fill or kill.
        FillOrKill = "4",
        /// Good till crossing.
        GoodTillCrossing = "5",
        /// Good till date.
        GoodTillDate = "6",
        /// At the close.
        AtTheClose = "7",
    }
}

fix_enum! {
    /// EncryptMethod (tag 98).
    pub enum EncryptMethod {
        /// None / other.
        None = "0",
        /// PKCS.
        Pkcs = "1",
        /// DES (ECB mode).
        Des = "2",
        /// PKCS/DES.
        PkcsDes = "3",
        /// PGP/DES.
        PgpDes = "4",
        /// PGP/DES-MD5.
        PgpDesMd5 = "5",
        /// PEM/DES-MD5.
        PemDesMd5 = "6",
    }
}

fix_enum! {
    /// ExecType (tag 150).
    pub enum ExecType {
        /// New.
        New = "0",
        /// Partial fill.
        PartialFill = "1",
        /// Fill.
        Fill = "2",
        /// Done for day.
        DoneForDay = "3",
        /// Canceled.
        Canceled = "4",
        /// Replace.
        Replace = "5",
        /// Pending cancel.
        PendingCancel = "6",
        /// Stopped.
        Stopped = "7",
        /// Rejected.
        Rejected = "8",
        /// Suspended.
        Suspended = "9",
        /// Pending new.
        PendingNew = "A",
        /// Calculated.
        Calculated = "B",
        /// Expired.
        Expired = "C",
        /// Restated.
        Restated = "D",
        /// Pending replace.
        PendingReplace = "E",
    }
}

fix_enum! {
    /// OrdStatus (tag 39).
    pub enum OrdStatus {
        /// New.
        New = "0",
        /// Partially filled.
        PartiallyFilled = "1",
        /// Filled.
        Filled = "2",
        /// Done for day.
        DoneForDay = "3",
        /// Canceled.
        Canceled = "4",
        /// Replaced.
        Replaced = "5",
        /// Pending cancel.
        PendingCancel = "6",
        /// Stopped.
        Stopped = "7",
        /// Rejected.
        Rejected = "8",
        /// Suspended.
        Suspended = "9",
        /// Pending new.
        PendingNew = "A",
        /// Calculated.
        Calculated = "B",
        /// Expired.
        Expired = "C",
        /// Accepted for bidding.
        AcceptedForBidding = "D",
        /// Pending replace.
        PendingReplace = "E",
    }
}

fix_enum! {
    /// ExecTransType (tag 20).
    pub enum ExecTransType {
        /// New.
        New = "0",
        /// Cancel.
        Cancel = "1",
        /// Correct.
        Correct = "2",
        /// Status.
        Status = "3",
    }
}

fix_enum! {
    /// HandlInst (tag 21).
    pub enum HandlInst {
        /// Automated execution, no broker intervention.
        AutomatedPrivate = "1",
        /// Automated execution, broker intervention OK.
        AutomatedPublic = "2",
        /// Manual order, best execution.
        Manual = "3",
    }
}

fix_enum! {
    /// AllocTransType (tag 71).
    pub enum AllocTransType {
        /// New.
        New = "0",
        /// Replace.
        Replace = "1",
        /// Cancel.
        Cancel = "2",
        /// Preliminary.
        Preliminary = "3",
        /// Calculated.
        Calculated = "4",
        /// Calculated without preliminary.
        CalculatedWithoutPreliminary = "5",
    }
}

//! Quote and trade records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Converts a raw microseconds-since-epoch integer into a UTC timestamp.
#[must_use]
pub fn micros_to_datetime(micros: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
}

/// Best bid/ask update from a daily quote file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Exchange identifier.
    pub exchange: String,
    /// Instrument symbol.
    pub symbol: String,
    /// Exchange event time; the time axis of every derived series.
    pub timestamp: DateTime<Utc>,
    /// Local receipt time.
    pub local_timestamp: DateTime<Utc>,
    /// Size resting at the best ask.
    pub ask_amount: f64,
    /// Best ask price.
    pub ask_price: f64,
    /// Best bid price.
    pub bid_price: f64,
    /// Size resting at the best bid.
    pub bid_amount: f64,
}

impl Quote {
    /// Creates a quote with empty exchange/symbol labels and a local
    /// timestamp equal to the event timestamp.
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        ask_amount: f64,
        ask_price: f64,
        bid_price: f64,
        bid_amount: f64,
    ) -> Self {
        Self {
            exchange: String::new(),
            symbol: String::new(),
            timestamp,
            local_timestamp: timestamp,
            ask_amount,
            ask_price,
            bid_price,
            bid_amount,
        }
    }

    /// Returns the tick-normalized mid price, `(ask + bid) / (2 * tick_size)`.
    ///
    /// The result is in ticks, not currency units.
    #[must_use]
    pub fn mid_price(&self, tick_size: f64) -> f64 {
        (self.ask_price + self.bid_price) / (2.0 * tick_size)
    }
}

/// Aggressor side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buyer-initiated trade.
    Buy,
    /// Seller-initiated trade.
    Sell,
}

impl Side {
    /// Returns `1.0` for buys and `-1.0` for sells.
    #[must_use]
    pub const fn sign(&self) -> f64 {
        match self {
            Self::Buy => 1.0,
            Self::Sell => -1.0,
        }
    }

    /// Returns the side as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Side {
    type Err = SideParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            _ => Err(SideParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid trade side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideParseError(String);

impl std::fmt::Display for SideParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid side '{}', expected buy or sell", self.0)
    }
}

impl std::error::Error for SideParseError {}

/// Executed trade from a daily trade file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Exchange identifier.
    pub exchange: String,
    /// Instrument symbol.
    pub symbol: String,
    /// Exchange event time.
    pub timestamp: DateTime<Utc>,
    /// Local receipt time.
    pub local_timestamp: DateTime<Utc>,
    /// Exchange trade id.
    pub id: u64,
    /// Aggressor side.
    pub side: Side,
    /// Execution price.
    pub price: f64,
    /// Traded amount (non-negative).
    pub amount: f64,
}

impl Trade {
    /// Creates a trade with empty exchange/symbol labels.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, id: u64, side: Side, price: f64, amount: f64) -> Self {
        Self {
            exchange: String::new(),
            symbol: String::new(),
            timestamp,
            local_timestamp: timestamp,
            id,
            side,
            price,
            amount,
        }
    }

    /// Returns `+amount` for buys and `-amount` for sells.
    #[must_use]
    pub fn signed_amount(&self) -> f64 {
        self.side.sign() * self.amount
    }
}

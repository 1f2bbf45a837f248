//! Trade domain models.

use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::trades_errors::TradeError;

lazy_static! {
    static ref SYMBOL_PATTERN: Regex =
        Regex::new(r"^[A-Za-z0-9]+$").expect("symbol pattern is a valid regex");
}

/// Returns true when the symbol is made of ASCII letters and digits only.
pub fn is_valid_symbol_format(symbol: &str) -> bool {
    SYMBOL_PATTERN.is_match(symbol)
}

/// Direction of a trade. Closed set: the replay fold matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeType {
    Buy,
    Sell,
}

impl TradeType {
    /// Returns the storage/wire representation of this trade type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Buy => "BUY",
            TradeType::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::Buy => write!(f, "Buy"),
            TradeType::Sell => write!(f, "Sell"),
        }
    }
}

impl FromStr for TradeType {
    type Err = TradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeType::Buy),
            "SELL" => Ok(TradeType::Sell),
            other => Err(TradeError::InvalidType(other.to_string())),
        }
    }
}

/// A persisted ledger entry.
///
/// `created_at` is stamped by the mutation coordinator right before insert and
/// is only used to break ties between trades sharing a `trade_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: i32,
    pub symbol: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub trade_type: TradeType,
    pub trade_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl Trade {
    /// Gross value of the trade (`quantity × price`).
    pub fn total_value(&self) -> Decimal {
        self.quantity * self.price
    }

    /// Symbols are case-insensitive; the replay keys holdings by the uppercase form.
    pub fn normalized_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }

    /// Case-insensitive symbol match.
    pub fn matches_symbol(&self, symbol: &str) -> bool {
        self.symbol.to_uppercase() == symbol.to_uppercase()
    }

    /// Canonical replay order: `trade_date`, then `created_at`, then `id` for
    /// records stamped within the same instant.
    pub fn replay_cmp(&self, other: &Trade) -> Ordering {
        self.trade_date
            .cmp(&other.trade_date)
            .then_with(|| self.created_at.cmp(&other.created_at))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Candidate trade submitted by a caller. Never carries `created_at`.
///
/// `id` is only set when the candidate replaces an existing record; validation
/// then reverses that record's contribution before checking availability. It
/// never travels on the wire: a replacement takes its id from the request path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrade {
    #[serde(skip)]
    pub id: Option<i32>,
    pub symbol: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub trade_type: TradeType,
    pub trade_date: NaiveDate,
}

impl NewTrade {
    pub fn new(
        symbol: impl Into<String>,
        quantity: Decimal,
        price: Decimal,
        trade_type: TradeType,
        trade_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            symbol: symbol.into(),
            quantity,
            price,
            trade_type,
            trade_date,
        }
    }

    pub fn buy(
        symbol: impl Into<String>,
        quantity: Decimal,
        price: Decimal,
        trade_date: NaiveDate,
    ) -> Self {
        Self::new(symbol, quantity, price, TradeType::Buy, trade_date)
    }

    pub fn sell(
        symbol: impl Into<String>,
        quantity: Decimal,
        price: Decimal,
        trade_date: NaiveDate,
    ) -> Self {
        Self::new(symbol, quantity, price, TradeType::Sell, trade_date)
    }

    /// Marks this candidate as a replacement for the stored record `id`.
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Drops any replacement marker, making this a plain insert.
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    /// Id of the record this candidate replaces, if any.
    pub fn existing_id(&self) -> Option<i32> {
        self.id.filter(|id| *id > 0)
    }

    /// Builds the storage payload, stamping the insertion instant.
    pub fn to_insert(&self, created_at: NaiveDateTime) -> TradeInsert {
        TradeInsert {
            symbol: self.symbol.clone(),
            quantity: self.quantity,
            price: self.price,
            trade_type: self.trade_type,
            trade_date: self.trade_date,
            created_at,
        }
    }
}

/// Payload handed to the Ledger Store for insertion. The store assigns `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeInsert {
    pub symbol: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub trade_type: TradeType,
    pub trade_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Verdict produced by the trade validator.
///
/// Errors block the trade; warnings are informational and never affect `is_valid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a ledger mutation as reported to callers: a success flag plus
/// the validation verdict when one was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
}

impl MutationResult {
    pub fn persisted(validation: Option<ValidationResult>) -> Self {
        Self {
            success: true,
            validation,
        }
    }

    pub fn failed(validation: Option<ValidationResult>) -> Self {
        Self {
            success: false,
            validation,
        }
    }
}

//! Database models for trades.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use log::error;
use rust_decimal::Decimal;
use std::str::FromStr;

use tradebook_core::errors::Error;
use tradebook_core::{Trade, TradeInsert, TradeType};

/// Parses a stored decimal, substituting zero for unreadable text so the
/// record still surfaces (and fails the integrity scan) instead of hiding.
fn parse_decimal_tolerant(value: &str, field_name: &str, trade_id: i32) -> Decimal {
    Decimal::from_str(value.trim()).unwrap_or_else(|e| {
        error!(
            "Trade {}: failed to parse {} '{}': {}. Using 0.",
            trade_id, field_name, value, e
        );
        Decimal::ZERO
    })
}

/// Decimals are stored as normalized text to keep them exact.
fn decimal_to_text(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Database model for trades
#[derive(Queryable, Identifiable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::trades)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TradeDB {
    pub id: i32,
    pub symbol: String,
    pub quantity: String,
    pub price: String,
    pub trade_type: String,
    pub trade_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Database model for inserting a trade. `id` is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::trades)]
pub struct NewTradeDB {
    pub symbol: String,
    pub quantity: String,
    pub price: String,
    pub trade_type: String,
    pub trade_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl TryFrom<TradeDB> for Trade {
    type Error = Error;

    fn try_from(db: TradeDB) -> Result<Self, Self::Error> {
        Ok(Trade {
            id: db.id,
            quantity: parse_decimal_tolerant(&db.quantity, "quantity", db.id),
            price: parse_decimal_tolerant(&db.price, "price", db.id),
            trade_type: TradeType::from_str(&db.trade_type)?,
            symbol: db.symbol,
            trade_date: db.trade_date,
            created_at: db.created_at,
        })
    }
}

impl From<Trade> for TradeDB {
    fn from(domain: Trade) -> Self {
        Self {
            id: domain.id,
            symbol: domain.symbol,
            quantity: decimal_to_text(domain.quantity),
            price: decimal_to_text(domain.price),
            trade_type: domain.trade_type.as_str().to_string(),
            trade_date: domain.trade_date,
            created_at: domain.created_at,
        }
    }
}

impl From<TradeInsert> for NewTradeDB {
    fn from(domain: TradeInsert) -> Self {
        Self {
            symbol: domain.symbol,
            quantity: decimal_to_text(domain.quantity),
            price: decimal_to_text(domain.price),
            trade_type: domain.trade_type.as_str().to_string(),
            trade_date: domain.trade_date,
            created_at: domain.created_at,
        }
    }
}

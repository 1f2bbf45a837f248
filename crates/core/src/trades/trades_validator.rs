use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::trades_model::{is_valid_symbol_format, NewTrade, TradeType, ValidationResult};
use super::trades_traits::{TradeRepositoryTrait, TradeValidatorTrait};
use crate::constants::{MAX_SYMBOL_LENGTH, QUANTITY_DISPLAY_PRECISION, TRADE_DATE_FORMAT};
use crate::errors::{Error, Result};
use crate::portfolio::HoldingsServiceTrait;
use crate::utils::format_utils::format_grouped;
use crate::utils::time_utils::Clock;

pub const SYMBOL_REQUIRED: &str = "Stock symbol is required";
pub const SYMBOL_TOO_LONG: &str = "Stock symbol must be 10 characters or less";
pub const SYMBOL_NOT_ALPHANUMERIC: &str = "Stock symbol must contain only alphanumeric characters";
pub const QUANTITY_NOT_POSITIVE: &str = "Quantity must be greater than 0";
pub const PRICE_NOT_POSITIVE: &str = "Price must be greater than 0";
pub const DATE_IN_FUTURE: &str = "Trade date cannot be in the future";
pub const HOLDINGS_UNVERIFIED: &str = "Unable to verify current holdings for sell validation";

/// Field-level checks that need no ledger access.
///
/// Symbol checks stop at the first failure; quantity, price and date are
/// checked independently so every violated rule is reported together.
pub fn validate_trade_fields(trade: &NewTrade, today: NaiveDate, result: &mut ValidationResult) {
    if trade.symbol.trim().is_empty() {
        result.add_error(SYMBOL_REQUIRED);
    } else if trade.symbol.chars().count() > MAX_SYMBOL_LENGTH {
        result.add_error(SYMBOL_TOO_LONG);
    } else if !is_valid_symbol_format(&trade.symbol) {
        result.add_error(SYMBOL_NOT_ALPHANUMERIC);
    }

    if trade.quantity <= Decimal::ZERO {
        result.add_error(QUANTITY_NOT_POSITIVE);
    }

    if trade.price <= Decimal::ZERO {
        result.add_error(PRICE_NOT_POSITIVE);
    }

    if trade.trade_date > today {
        result.add_error(DATE_IN_FUTURE);
    }
}

pub struct TradeValidator {
    repository: Arc<dyn TradeRepositoryTrait>,
    holdings_service: Arc<dyn HoldingsServiceTrait>,
    clock: Arc<dyn Clock>,
}

impl TradeValidator {
    pub fn new(
        repository: Arc<dyn TradeRepositoryTrait>,
        holdings_service: Arc<dyn HoldingsServiceTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            holdings_service,
            clock,
        }
    }

    /// Quantity available to sell on the candidate's trade date. For a
    /// replacement, the stored record's own contribution is reversed first.
    fn available_for_sell(&self, trade: &NewTrade) -> Result<Decimal> {
        let mut available = self
            .holdings_service
            .try_get_quantity(&trade.symbol, Some(trade.trade_date))?;

        if let Some(existing_id) = trade.existing_id() {
            if let Some(existing) = self.repository.get_trade(existing_id)? {
                available = match existing.trade_type {
                    TradeType::Buy => available.checked_add(existing.quantity),
                    TradeType::Sell => available.checked_sub(existing.quantity),
                }
                .ok_or_else(|| {
                    Error::Calculation(format!(
                        "available quantity of {} overflowed",
                        trade.symbol
                    ))
                })?;
            }
        }

        Ok(available)
    }

    fn check_sell_availability(&self, trade: &NewTrade, result: &mut ValidationResult) {
        match self.available_for_sell(trade) {
            Ok(available) if trade.quantity > available => {
                result.add_error(format!(
                    "Cannot sell {} shares of {}. Only {} shares available as of {}",
                    format_grouped(trade.quantity, QUANTITY_DISPLAY_PRECISION),
                    trade.symbol,
                    format_grouped(available, QUANTITY_DISPLAY_PRECISION),
                    trade.trade_date.format(TRADE_DATE_FORMAT)
                ));
            }
            Ok(_) => {}
            Err(e) => {
                warn!(
                    "Could not load holdings of {} for sell validation: {}",
                    trade.symbol, e
                );
                result.add_warning(HOLDINGS_UNVERIFIED);
            }
        }
    }
}

impl TradeValidatorTrait for TradeValidator {
    fn validate_trade(&self, trade: &NewTrade) -> ValidationResult {
        let mut result = ValidationResult::new();
        validate_trade_fields(trade, self.clock.today(), &mut result);

        if trade.trade_type == TradeType::Sell {
            self.check_sell_availability(trade, &mut result);
        }

        result
    }
}

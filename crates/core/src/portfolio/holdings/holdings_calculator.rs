use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::holdings_model::PortfolioHolding;
use crate::errors::{Error, Result};
use crate::trades::{Trade, TradeType};

pub(crate) fn overflow(what: &str, symbol: &str) -> Error {
    Error::Calculation(format!("{} of {} overflowed", what, symbol))
}

/// Running state of one symbol during a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionState {
    pub quantity: Decimal,
    pub average_cost_basis: Decimal,
}

impl PositionState {
    /// Folds one trade into the position.
    ///
    /// A buy recomputes the weighted-average cost. A sell leaves the cost
    /// untouched unless it liquidates the position, which resets both fields.
    /// Returns `None` when a step leaves the decimal range; the state is then
    /// left unchanged.
    pub fn apply(
        &mut self,
        trade_type: TradeType,
        quantity: Decimal,
        price: Decimal,
    ) -> Option<()> {
        match trade_type {
            TradeType::Buy => {
                let new_quantity = self.quantity.checked_add(quantity)?;
                let average_cost_basis = if new_quantity > Decimal::ZERO {
                    let held_cost = self.quantity.checked_mul(self.average_cost_basis)?;
                    let bought_cost = quantity.checked_mul(price)?;
                    held_cost.checked_add(bought_cost)?.checked_div(new_quantity)?
                } else {
                    Decimal::ZERO
                };
                self.quantity = new_quantity;
                self.average_cost_basis = average_cost_basis;
            }
            TradeType::Sell => {
                let remaining = self.quantity.checked_sub(quantity)?;
                if remaining <= Decimal::ZERO {
                    *self = Self::default();
                } else {
                    self.quantity = remaining;
                }
            }
        }
        Some(())
    }
}

/// Pure replay of an ordered trade sequence into holdings.
pub struct HoldingsCalculator;

impl HoldingsCalculator {
    /// Replays trades already sorted in canonical order. Symbols are keyed by
    /// their uppercase form; positions that end at zero are omitted. The
    /// result is sorted by symbol.
    ///
    /// Fails with `Error::Calculation` when a position or its value leaves
    /// the decimal range.
    pub fn replay<'a, I>(trades: I) -> Result<Vec<PortfolioHolding>>
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        let mut positions: BTreeMap<String, PositionState> = BTreeMap::new();
        for trade in trades {
            let symbol = trade.normalized_symbol();
            positions
                .entry(symbol.clone())
                .or_default()
                .apply(trade.trade_type, trade.quantity, trade.price)
                .ok_or_else(|| overflow("position", &symbol))?;
        }

        positions
            .into_iter()
            .filter(|(_, state)| state.quantity > Decimal::ZERO)
            .map(|(symbol, state)| {
                PortfolioHolding::try_new(symbol, state.quantity, state.average_cost_basis)
            })
            .collect()
    }

    /// Signed running quantity of one symbol. Only the final value is
    /// clamped at zero; intermediate oversells carry through.
    pub fn replay_quantity<'a, I>(trades: I, symbol: &str) -> Result<Decimal>
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        let total = trades
            .into_iter()
            .filter(|t| t.matches_symbol(symbol))
            .try_fold(Decimal::ZERO, |acc, t| match t.trade_type {
                TradeType::Buy => acc.checked_add(t.quantity),
                TradeType::Sell => acc.checked_sub(t.quantity),
            })
            .ok_or_else(|| overflow("quantity", symbol))?;
        Ok(total.max(Decimal::ZERO))
    }

    /// Snapshot as of `as_of` (inclusive) from an unfiltered, unordered ledger.
    pub fn snapshot_as_of(trades: &[Trade], as_of: NaiveDate) -> Result<Vec<PortfolioHolding>> {
        Self::replay(&Self::ordered_up_to(trades, as_of))
    }

    /// Quantity of `symbol` as of `as_of` (inclusive) from an unfiltered, unordered ledger.
    pub fn quantity_as_of(trades: &[Trade], symbol: &str, as_of: NaiveDate) -> Result<Decimal> {
        Self::replay_quantity(&Self::ordered_up_to(trades, as_of), symbol)
    }

    fn ordered_up_to(trades: &[Trade], as_of: NaiveDate) -> Vec<Trade> {
        let mut selected: Vec<Trade> = trades
            .iter()
            .filter(|t| t.trade_date <= as_of)
            .cloned()
            .collect();
        selected.sort_by(|a, b| a.replay_cmp(b));
        selected
    }
}

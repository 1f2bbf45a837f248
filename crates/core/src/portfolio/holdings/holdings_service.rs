use chrono::NaiveDate;
use log::{debug, error};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::holdings_calculator::HoldingsCalculator;
use super::holdings_model::PortfolioHolding;
use crate::errors::Result;
use crate::trades::TradeRepositoryTrait;
use crate::utils::time_utils::Clock;

/// Read side of the ledger: every call re-replays the store.
///
/// The infallible methods substitute an empty list or zero when the ledger
/// cannot be read, and log the failure. The `try_` variants propagate it.
pub trait HoldingsServiceTrait: Send + Sync {
    /// Holdings as of `as_of` (inclusive), or today when `None`.
    fn get_holdings(&self, as_of: Option<NaiveDate>) -> Vec<PortfolioHolding>;
    fn get_current_holdings(&self) -> Vec<PortfolioHolding>;

    /// Quantity held of `symbol` as of `as_of` (inclusive), or today when `None`. Never negative.
    fn get_quantity(&self, symbol: &str, as_of: Option<NaiveDate>) -> Decimal;
    fn get_current_quantity(&self, symbol: &str) -> Decimal;

    fn try_get_holdings(&self, as_of: Option<NaiveDate>) -> Result<Vec<PortfolioHolding>>;
    fn try_get_quantity(&self, symbol: &str, as_of: Option<NaiveDate>) -> Result<Decimal>;
}

pub struct HoldingsService {
    repository: Arc<dyn TradeRepositoryTrait>,
    clock: Arc<dyn Clock>,
}

impl HoldingsService {
    pub fn new(repository: Arc<dyn TradeRepositoryTrait>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    fn resolve_as_of(&self, as_of: Option<NaiveDate>) -> NaiveDate {
        as_of.unwrap_or_else(|| self.clock.today())
    }
}

impl HoldingsServiceTrait for HoldingsService {
    fn get_holdings(&self, as_of: Option<NaiveDate>) -> Vec<PortfolioHolding> {
        self.try_get_holdings(as_of).unwrap_or_else(|e| {
            error!("Failed to compute holdings, returning none: {}", e);
            Vec::new()
        })
    }

    fn get_current_holdings(&self) -> Vec<PortfolioHolding> {
        self.get_holdings(None)
    }

    fn get_quantity(&self, symbol: &str, as_of: Option<NaiveDate>) -> Decimal {
        self.try_get_quantity(symbol, as_of).unwrap_or_else(|e| {
            error!("Failed to compute quantity of {}, returning 0: {}", symbol, e);
            Decimal::ZERO
        })
    }

    fn get_current_quantity(&self, symbol: &str) -> Decimal {
        self.get_quantity(symbol, None)
    }

    fn try_get_holdings(&self, as_of: Option<NaiveDate>) -> Result<Vec<PortfolioHolding>> {
        let as_of = self.resolve_as_of(as_of);
        let trades = self.repository.get_trades_up_to(as_of, None)?;
        debug!("Replaying {} trades as of {}", trades.len(), as_of);
        HoldingsCalculator::replay(&trades)
    }

    fn try_get_quantity(&self, symbol: &str, as_of: Option<NaiveDate>) -> Result<Decimal> {
        let as_of = self.resolve_as_of(as_of);
        let trades = self.repository.get_trades_up_to(as_of, Some(symbol))?;
        HoldingsCalculator::replay_quantity(&trades, symbol)
    }
}

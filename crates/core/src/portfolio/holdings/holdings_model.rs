use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::holdings_calculator::overflow;
use crate::errors::Result;

/// A position derived from replaying the ledger. Never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHolding {
    pub symbol: String,
    pub quantity: Decimal,
    pub average_cost_basis: Decimal,
    /// `quantity × average_cost_basis`
    pub total_value: Decimal,
}

impl PortfolioHolding {
    /// Builds a holding, failing when `quantity × average_cost_basis` overflows.
    pub fn try_new(
        symbol: impl Into<String>,
        quantity: Decimal,
        average_cost_basis: Decimal,
    ) -> Result<Self> {
        let symbol = symbol.into();
        let total_value = quantity
            .checked_mul(average_cost_basis)
            .ok_or_else(|| overflow("total value", &symbol))?;
        Ok(Self {
            symbol,
            quantity,
            average_cost_basis,
            total_value,
        })
    }
}

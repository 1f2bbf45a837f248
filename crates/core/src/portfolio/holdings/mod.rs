//! Holdings module - the replay engine and the holdings read service.

mod holdings_calculator;
mod holdings_model;
mod holdings_service;

#[cfg(test)]
mod holdings_calculator_tests;


pub use holdings_calculator::{HoldingsCalculator, PositionState};
pub use holdings_model::PortfolioHolding;
pub use holdings_service::{HoldingsService, HoldingsServiceTrait};

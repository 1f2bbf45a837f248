//! Trades module - the ledger's record type, validation, and mutation coordination.

mod retry;
mod trades_errors;
mod trades_model;
mod trades_service;
mod trades_traits;
mod trades_validator;

#[cfg(test)]
pub(crate) mod test_support;




pub use retry::{is_transient_failure, RetryPolicy, TRANSIENT_MARKERS};
pub use trades_errors::TradeError;
pub use trades_model::{
    is_valid_symbol_format, MutationResult, NewTrade, Trade, TradeInsert, TradeType,
    ValidationResult,
};
pub use trades_service::TradeService;
pub use trades_traits::{TradeRepositoryTrait, TradeServiceTrait, TradeValidatorTrait};
pub use trades_validator::{validate_trade_fields, TradeValidator};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::trades_model::{MutationResult, NewTrade, Trade, TradeInsert, ValidationResult};
use crate::Result;

/// Trait defining the contract for the Ledger Store.
///
/// Every scan returns trades in canonical replay order
/// (`trade_date`, `created_at`, `id` ascending). Symbol filters are
/// case-insensitive.
#[async_trait]
pub trait TradeRepositoryTrait: Send + Sync {
    fn get_trade(&self, trade_id: i32) -> Result<Option<Trade>>;
    fn get_trades(&self) -> Result<Vec<Trade>>;
    fn get_trades_by_symbol(&self, symbol: &str) -> Result<Vec<Trade>>;

    /// Trades with `trade_date <= as_of`, optionally restricted to one symbol.
    fn get_trades_up_to(&self, as_of: NaiveDate, symbol: Option<&str>) -> Result<Vec<Trade>>;

    fn count_trades(&self) -> Result<i64>;

    /// Number of trades with `trade_date < cutoff`.
    fn count_trades_before(&self, cutoff: NaiveDate) -> Result<i64>;

    /// Number of `(symbol, trade_date, quantity, price, trade_type)` groups
    /// that occur more than once.
    fn count_duplicate_groups(&self) -> Result<i64>;

    /// Cheap round trip to the store, used as a connectivity probe.
    fn ping(&self) -> Result<()>;

    async fn create_trade(&self, trade: TradeInsert) -> Result<Trade>;
    async fn create_trades(&self, trades: Vec<TradeInsert>) -> Result<usize>;

    /// Deletes `trade_id` and inserts `trade` in one transaction.
    async fn replace_trade(&self, trade_id: i32, trade: TradeInsert) -> Result<Trade>;

    async fn delete_trade(&self, trade_id: i32) -> Result<Trade>;

    /// Overwrites the given records in place in one transaction. Returns the row count.
    async fn update_trades(&self, trades: Vec<Trade>) -> Result<usize>;

    async fn delete_all_trades(&self) -> Result<usize>;
}

/// Decides whether a candidate trade may be appended to the ledger.
pub trait TradeValidatorTrait: Send + Sync {
    fn validate_trade(&self, trade: &NewTrade) -> ValidationResult;
}

/// Inbound trade operations. Mutations report a success flag and never
/// surface storage errors to the caller.
#[async_trait]
pub trait TradeServiceTrait: Send + Sync {
    fn get_trade(&self, trade_id: i32) -> Option<Trade>;
    fn get_all_trades(&self) -> Vec<Trade>;
    fn get_trades_by_symbol(&self, symbol: &str) -> Vec<Trade>;
    fn get_trades_up_to(&self, as_of: NaiveDate) -> Vec<Trade>;
    fn validate_trade(&self, trade: &NewTrade) -> ValidationResult;
    async fn add_trade(&self, trade: NewTrade) -> bool;

    /// Like `add_trade`, but returns the verdict the insert was decided on.
    /// `validation` is `None` when storage failed.
    async fn submit_trade(&self, trade: NewTrade) -> MutationResult;

    async fn replace_trade(&self, trade_id: i32, trade: NewTrade) -> bool;

    /// Like `replace_trade`, but returns the verdict the replacement was decided on.
    /// `validation` is `None` when the record is missing or storage failed.
    async fn submit_replacement(&self, trade_id: i32, trade: NewTrade) -> MutationResult;

    async fn delete_trade(&self, trade_id: i32) -> bool;
}

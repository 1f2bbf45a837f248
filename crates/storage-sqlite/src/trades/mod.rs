//! Trade storage: Diesel models and the `TradeRepository`.

mod model;
mod repository;

pub use model::{NewTradeDB, TradeDB};
pub use repository::TradeRepository;

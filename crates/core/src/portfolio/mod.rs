//! Portfolio module - holdings derived by replaying the trade ledger.

pub mod holdings;

pub use holdings::*;

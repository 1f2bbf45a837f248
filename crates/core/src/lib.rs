//! Tradebook Core - Domain entities, services, and traits.
//!
//! This crate holds the ledger engine for Tradebook: the trade model, the
//! holdings replay, trade validation, the mutation coordinator with its retry
//! policy, and the integrity auditor. It is database-agnostic and defines the
//! `TradeRepositoryTrait` implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod integrity;
pub mod portfolio;
pub mod seed;
pub mod trades;
pub mod utils;

// Re-export common types from the trade and portfolio modules
pub use portfolio::*;
pub use trades::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

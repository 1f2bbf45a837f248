//! Seed module - a fixed demo portfolio for empty ledgers.

mod seed_service;

pub use seed_service::{seed_trades, SeedDataService};

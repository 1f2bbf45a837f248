//! Integrity module.
//!
//! Batch audit of the trade ledger. The auditor scans every stored trade for
//! records that break the ledger invariants, reports soft signals (duplicates,
//! very old trades, ledger size), and can repair the two narrow cases that
//! need no human judgment.
//!
//! - **Models** (`model.rs`) - `IntegrityConfig`, `IntegrityResult`
//! - **Checks** (`checks.rs`) - Pure scans over a trade list
//! - **Traits** (`traits.rs`) - `IntegrityServiceTrait`
//! - **Service** (`service.rs`) - Runs the checks against the ledger store

mod checks;
mod model;
mod service;
mod traits;


pub use checks::{repair_trade, scale_warnings, CorruptionScan};
pub use model::{IntegrityConfig, IntegrityResult};
pub use service::IntegrityService;
pub use traits::IntegrityServiceTrait;

//! Integrity auditor trait.

use async_trait::async_trait;

use super::model::IntegrityResult;

/// Audits and repairs the trade ledger. Every operation reports its outcome
/// in its return value and never fails.
#[async_trait]
pub trait IntegrityServiceTrait: Send + Sync {
    /// Runs the connectivity probe, corruption scan, consistency scan and
    /// scale advisories.
    fn check_integrity(&self) -> IntegrityResult;

    /// Returns true when a trivial round trip to the store succeeds.
    fn validate_database_connection(&self) -> bool;

    /// Corruption issue lines only, one per violated invariant.
    fn check_for_corrupted_data(&self) -> Vec<String>;

    /// Truncates over-long symbols and clamps future trade dates to today.
    /// Returns true when the repairs were persisted, or nothing needed repair.
    async fn repair_data_corruption(&self) -> bool;
}

//! Integrity audit domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_SYMBOL_LENGTH;

/// Thresholds used by the integrity audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityConfig {
    /// Symbols longer than this are corrupt and get truncated on repair (default: 10)
    pub max_symbol_length: usize,

    /// Trades dated before `today - old_trade_years` raise a warning (default: 10)
    pub old_trade_years: u32,

    /// Ledger size above which a performance warning is raised (default: 10 000)
    pub large_ledger_threshold: i64,

    /// Ledger size above which an indexing advisory is raised (default: 1 000)
    pub index_advisory_threshold: i64,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            max_symbol_length: MAX_SYMBOL_LENGTH,
            old_trade_years: 10,
            large_ledger_threshold: 10_000,
            index_advisory_threshold: 1_000,
        }
    }
}

/// Outcome of a full integrity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityResult {
    /// True when no issues were found. Warnings do not affect health.
    pub is_healthy: bool,

    pub total_trades: i64,

    /// Number of corruption issue lines, one per violated invariant.
    pub corrupted_trades: usize,

    /// Hard corruption, each message carries its record count.
    pub issues: Vec<String>,

    /// Soft signals such as duplicates or scale advisories.
    pub warnings: Vec<String>,

    pub last_checked: NaiveDateTime,
}

impl IntegrityResult {
    pub fn new(last_checked: NaiveDateTime) -> Self {
        Self {
            is_healthy: true,
            total_trades: 0,
            corrupted_trades: 0,
            issues: Vec::new(),
            warnings: Vec::new(),
            last_checked,
        }
    }

    pub fn add_issue(&mut self, message: impl Into<String>) {
        self.issues.push(message.into());
        self.is_healthy = false;
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

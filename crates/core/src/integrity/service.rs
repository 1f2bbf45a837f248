//! Integrity service implementation.

use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::sync::Arc;

use super::checks::{repair_trade, scale_warnings, CorruptionScan};
use super::model::{IntegrityConfig, IntegrityResult};
use super::traits::IntegrityServiceTrait;
use crate::errors::Result;
use crate::trades::{Trade, TradeRepositoryTrait};
use crate::utils::time_utils::{years_before, Clock};

/// Audits the ledger store against the trade invariants.
pub struct IntegrityService {
    repository: Arc<dyn TradeRepositoryTrait>,
    clock: Arc<dyn Clock>,
    config: IntegrityConfig,
}

impl IntegrityService {
    pub fn new(repository: Arc<dyn TradeRepositoryTrait>, clock: Arc<dyn Clock>) -> Self {
        Self::with_config(repository, clock, IntegrityConfig::default())
    }

    pub fn with_config(
        repository: Arc<dyn TradeRepositoryTrait>,
        clock: Arc<dyn Clock>,
        config: IntegrityConfig,
    ) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    fn scan_corruption(&self) -> Result<Vec<String>> {
        let trades = self.repository.get_trades()?;
        let max_len = self.config.max_symbol_length;
        Ok(CorruptionScan::scan(&trades, self.clock.today(), max_len).issues(max_len))
    }

    /// Duplicate groups and very old trades. Both are warnings only.
    fn check_consistency(&self, result: &mut IntegrityResult) -> Result<()> {
        let duplicate_groups = self.repository.count_duplicate_groups()?;
        if duplicate_groups > 0 {
            result.add_warning(format!(
                "Found {} potential duplicate trade groups",
                duplicate_groups
            ));
        }

        let cutoff = years_before(self.clock.today(), self.config.old_trade_years);
        let old_trades = self.repository.count_trades_before(cutoff)?;
        if old_trades > 0 {
            result.add_warning(format!(
                "Found {} trades older than {} years",
                old_trades, self.config.old_trade_years
            ));
        }
        Ok(())
    }

    fn check_performance(&self, result: &mut IntegrityResult) -> Result<()> {
        let total_trades = self.repository.count_trades()?;
        for warning in scale_warnings(total_trades, &self.config) {
            result.add_warning(warning);
        }
        Ok(())
    }

    fn run_checks(&self, result: &mut IntegrityResult) -> Result<()> {
        result.total_trades = self.repository.count_trades()?;

        let corruption = self.check_for_corrupted_data();
        result.corrupted_trades = corruption.len();
        for issue in corruption {
            result.add_issue(issue);
        }

        if let Err(e) = self.check_consistency(result) {
            error!("Data consistency check failed: {}", e);
            result.add_issue(format!("Data consistency check failed: {}", e));
        }

        if let Err(e) = self.check_performance(result) {
            error!("Performance check failed: {}", e);
            result.add_warning(format!("Performance check failed: {}", e));
        }

        Ok(())
    }

    async fn apply_repairs(&self) -> Result<usize> {
        let today = self.clock.today();
        let max_len = self.config.max_symbol_length;
        let repaired: Vec<Trade> = self
            .repository
            .get_trades()?
            .iter()
            .filter_map(|trade| repair_trade(trade, today, max_len))
            .collect();

        if repaired.is_empty() {
            return Ok(0);
        }
        for trade in &repaired {
            debug!(
                "Repairing trade {}: symbol '{}', date {}",
                trade.id, trade.symbol, trade.trade_date
            );
        }
        self.repository.update_trades(repaired).await
    }
}

#[async_trait]
impl IntegrityServiceTrait for IntegrityService {
    fn check_integrity(&self) -> IntegrityResult {
        let mut result = IntegrityResult::new(self.clock.now());

        if !self.validate_database_connection() {
            result.add_issue("Database connection failed");
            return result;
        }

        if let Err(e) = self.run_checks(&mut result) {
            error!("Data integrity check failed: {}", e);
            result.add_issue(format!("Data integrity check failed: {}", e));
        }

        if result.is_healthy {
            info!(
                "Data integrity check completed: {} trades, {} warnings",
                result.total_trades,
                result.warnings.len()
            );
        } else {
            for issue in &result.issues {
                warn!("Integrity issue: {}", issue);
            }
        }
        for warning in &result.warnings {
            warn!("Integrity warning: {}", warning);
        }

        result
    }

    fn validate_database_connection(&self) -> bool {
        match self.repository.ping() {
            Ok(()) => true,
            Err(e) => {
                error!("Database connection validation failed: {}", e);
                false
            }
        }
    }

    fn check_for_corrupted_data(&self) -> Vec<String> {
        self.scan_corruption().unwrap_or_else(|e| {
            error!("Error checking for corrupted data: {}", e);
            vec![format!("Error checking data corruption: {}", e)]
        })
    }

    async fn repair_data_corruption(&self) -> bool {
        match self.apply_repairs().await {
            Ok(0) => {
                debug!("No repairable data corruption found");
                true
            }
            Ok(count) => {
                info!("Repaired {} corrupted trades", count);
                true
            }
            Err(e) => {
                error!("Error repairing data corruption: {}", e);
                false
            }
        }
    }
}

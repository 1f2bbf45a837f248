use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, error, info};
use std::sync::Arc;

use super::retry::RetryPolicy;
use super::trades_model::{MutationResult, NewTrade, Trade, ValidationResult};
use super::trades_traits::{TradeRepositoryTrait, TradeServiceTrait, TradeValidatorTrait};
use crate::errors::Result;
use crate::utils::time_utils::Clock;

/// Mutation coordinator for the ledger.
///
/// Every mutation runs its check (validation or existence lookup) and its
/// storage write inside one retry attempt, so a retried attempt starts from a
/// fresh read and a fresh `created_at` stamp.
pub struct TradeService {
    repository: Arc<dyn TradeRepositoryTrait>,
    validator: Arc<dyn TradeValidatorTrait>,
    clock: Arc<dyn Clock>,
    retry_policy: RetryPolicy,
}

impl TradeService {
    pub fn new(
        repository: Arc<dyn TradeRepositoryTrait>,
        validator: Arc<dyn TradeValidatorTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            validator,
            clock,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    async fn try_add_trade(&self, trade: &NewTrade) -> Result<MutationResult> {
        self.retry_policy
            .run("add_trade", |_| async move {
                let validation = self.validator.validate_trade(trade);
                if !validation.is_valid {
                    debug!(
                        "Rejected trade for {}: {}",
                        trade.symbol,
                        validation.errors.join("; ")
                    );
                    return Ok(MutationResult::failed(Some(validation)));
                }

                let created = self
                    .repository
                    .create_trade(trade.to_insert(self.clock.now()))
                    .await?;
                info!(
                    "Recorded {} of {} {} (id {})",
                    created.trade_type, created.quantity, created.symbol, created.id
                );
                Ok(MutationResult::persisted(Some(validation)))
            })
            .await
    }

    async fn try_replace_trade(&self, trade_id: i32, trade: &NewTrade) -> Result<MutationResult> {
        self.retry_policy
            .run("replace_trade", |_| async move {
                if self.repository.get_trade(trade_id)?.is_none() {
                    debug!("Trade {} not found for replacement", trade_id);
                    return Ok(MutationResult::failed(None));
                }

                let validation = self.validator.validate_trade(trade);
                if !validation.is_valid {
                    debug!(
                        "Rejected replacement of trade {}: {}",
                        trade_id,
                        validation.errors.join("; ")
                    );
                    return Ok(MutationResult::failed(Some(validation)));
                }

                let replaced = self
                    .repository
                    .replace_trade(trade_id, trade.to_insert(self.clock.now()))
                    .await?;
                info!("Replaced trade {} with trade {}", trade_id, replaced.id);
                Ok(MutationResult::persisted(Some(validation)))
            })
            .await
    }

    async fn try_delete_trade(&self, trade_id: i32) -> Result<bool> {
        self.retry_policy
            .run("delete_trade", |_| async move {
                if self.repository.get_trade(trade_id)?.is_none() {
                    debug!("Trade {} not found for deletion", trade_id);
                    return Ok(false);
                }

                self.repository.delete_trade(trade_id).await?;
                info!("Deleted trade {}", trade_id);
                Ok(true)
            })
            .await
    }
}

#[async_trait]
impl TradeServiceTrait for TradeService {
    fn get_trade(&self, trade_id: i32) -> Option<Trade> {
        self.repository.get_trade(trade_id).unwrap_or_else(|e| {
            error!("Failed to load trade {}: {}", trade_id, e);
            None
        })
    }

    fn get_all_trades(&self) -> Vec<Trade> {
        self.repository.get_trades().unwrap_or_else(|e| {
            error!("Failed to load trades: {}", e);
            Vec::new()
        })
    }

    fn get_trades_by_symbol(&self, symbol: &str) -> Vec<Trade> {
        self.repository
            .get_trades_by_symbol(symbol)
            .unwrap_or_else(|e| {
                error!("Failed to load trades for {}: {}", symbol, e);
                Vec::new()
            })
    }

    fn get_trades_up_to(&self, as_of: NaiveDate) -> Vec<Trade> {
        self.repository
            .get_trades_up_to(as_of, None)
            .unwrap_or_else(|e| {
                error!("Failed to load trades up to {}: {}", as_of, e);
                Vec::new()
            })
    }

    fn validate_trade(&self, trade: &NewTrade) -> ValidationResult {
        self.validator.validate_trade(trade)
    }

    async fn add_trade(&self, trade: NewTrade) -> bool {
        self.submit_trade(trade).await.success
    }

    async fn submit_trade(&self, trade: NewTrade) -> MutationResult {
        // A plain insert never reverses a stored record.
        let trade = trade.without_id();
        self.try_add_trade(&trade).await.unwrap_or_else(|e| {
            error!("Failed to add trade for {}: {}", trade.symbol, e);
            MutationResult::failed(None)
        })
    }

    async fn replace_trade(&self, trade_id: i32, trade: NewTrade) -> bool {
        self.submit_replacement(trade_id, trade).await.success
    }

    async fn submit_replacement(&self, trade_id: i32, trade: NewTrade) -> MutationResult {
        let trade = trade.with_id(trade_id);
        self.try_replace_trade(trade_id, &trade)
            .await
            .unwrap_or_else(|e| {
                error!("Failed to replace trade {}: {}", trade_id, e);
                MutationResult::failed(None)
            })
    }

    async fn delete_trade(&self, trade_id: i32) -> bool {
        self.try_delete_trade(trade_id).await.unwrap_or_else(|e| {
            error!("Failed to delete trade {}: {}", trade_id, e);
            false
        })
    }
}

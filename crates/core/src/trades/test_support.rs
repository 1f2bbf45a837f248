//! In-memory ledger shared by the core unit tests.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use super::trades_model::{Trade, TradeInsert, TradeType};
use super::trades_traits::TradeRepositoryTrait;
use crate::errors::{DatabaseError, Error, Result};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn stamp(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

/// Builds a persisted trade stamped at midday of its trade date.
pub(crate) fn trade(
    id: i32,
    symbol: &str,
    trade_type: TradeType,
    quantity: Decimal,
    price: Decimal,
    trade_date: NaiveDate,
) -> Trade {
    Trade {
        id,
        symbol: symbol.to_string(),
        quantity,
        price,
        trade_type,
        trade_date,
        created_at: trade_date.and_hms_opt(12, 0, 0).unwrap(),
    }
}

/// A query that fails once its first `successes` calls have gone through.
struct QueryFailure {
    successes: usize,
    message: String,
}

#[derive(Clone, Default)]
pub(crate) struct MockTradeRepository {
    trades: Arc<Mutex<Vec<Trade>>>,
    next_id: Arc<Mutex<i32>>,
    fail_reads: Arc<Mutex<Option<String>>>,
    query_failures: Arc<Mutex<HashMap<&'static str, QueryFailure>>>,
    write_failures: Arc<Mutex<VecDeque<DatabaseError>>>,
    write_calls: Arc<Mutex<usize>>,
    insert_stamps: Arc<Mutex<Vec<NaiveDateTime>>>,
}

impl MockTradeRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_trades(trades: Vec<Trade>) -> Self {
        let repo = Self::new();
        for trade in trades {
            repo.push(trade);
        }
        repo
    }

    /// Stores a trade as-is, bypassing validation.
    pub(crate) fn push(&self, trade: Trade) {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id = (*next_id).max(trade.id);
        self.trades.lock().unwrap().push(trade);
    }

    /// Makes every read fail with a connection error until cleared.
    pub(crate) fn fail_reads(&self, message: &str) {
        *self.fail_reads.lock().unwrap() = Some(message.to_string());
    }

    /// Makes every call of one read method fail with a query error.
    pub(crate) fn fail_query(&self, method: &'static str, message: &str) {
        self.fail_query_after(method, 0, message);
    }

    /// Lets the first `successes` calls of `method` through, then fails the rest.
    pub(crate) fn fail_query_after(&self, method: &'static str, successes: usize, message: &str) {
        self.query_failures.lock().unwrap().insert(
            method,
            QueryFailure {
                successes,
                message: message.to_string(),
            },
        );
    }

    /// Queues errors returned by the next write calls, one per call.
    pub(crate) fn fail_next_writes(&self, errors: Vec<DatabaseError>) {
        self.write_failures.lock().unwrap().extend(errors);
    }

    pub(crate) fn write_calls(&self) -> usize {
        *self.write_calls.lock().unwrap()
    }

    /// `created_at` of every `create_trade` call, including failed ones.
    pub(crate) fn insert_stamps(&self) -> Vec<NaiveDateTime> {
        self.insert_stamps.lock().unwrap().clone()
    }

    pub(crate) fn snapshot(&self) -> Vec<Trade> {
        let mut trades = self.trades.lock().unwrap().clone();
        trades.sort_by(|a, b| a.replay_cmp(b));
        trades
    }

    fn check_read(&self, method: &'static str) -> Result<()> {
        if let Some(message) = self.fail_reads.lock().unwrap().as_ref() {
            return Err(Error::Database(DatabaseError::ConnectionFailed(
                message.clone(),
            )));
        }
        match self.query_failures.lock().unwrap().get_mut(method) {
            Some(failure) if failure.successes > 0 => {
                failure.successes -= 1;
                Ok(())
            }
            Some(failure) => Err(Error::Database(DatabaseError::QueryFailed(
                failure.message.clone(),
            ))),
            None => Ok(()),
        }
    }

    fn begin_write(&self) -> Result<()> {
        *self.write_calls.lock().unwrap() += 1;
        match self.write_failures.lock().unwrap().pop_front() {
            Some(err) => Err(Error::Database(err)),
            None => Ok(()),
        }
    }

    fn insert(&self, trade: TradeInsert) -> Trade {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let stored = Trade {
            id: *next_id,
            symbol: trade.symbol,
            quantity: trade.quantity,
            price: trade.price,
            trade_type: trade.trade_type,
            trade_date: trade.trade_date,
            created_at: trade.created_at,
        };
        self.trades.lock().unwrap().push(stored.clone());
        stored
    }

    fn remove(&self, trade_id: i32) -> Result<Trade> {
        let mut trades = self.trades.lock().unwrap();
        let idx = trades
            .iter()
            .position(|t| t.id == trade_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(trade_id.to_string())))?;
        Ok(trades.remove(idx))
    }
}

#[async_trait]
impl TradeRepositoryTrait for MockTradeRepository {
    fn get_trade(&self, trade_id: i32) -> Result<Option<Trade>> {
        self.check_read("get_trade")?;
        Ok(self
            .trades
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == trade_id)
            .cloned())
    }

    fn get_trades(&self) -> Result<Vec<Trade>> {
        self.check_read("get_trades")?;
        Ok(self.snapshot())
    }

    fn get_trades_by_symbol(&self, symbol: &str) -> Result<Vec<Trade>> {
        self.check_read("get_trades_by_symbol")?;
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|t| t.matches_symbol(symbol))
            .collect())
    }

    fn get_trades_up_to(&self, as_of: NaiveDate, symbol: Option<&str>) -> Result<Vec<Trade>> {
        self.check_read("get_trades_up_to")?;
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|t| t.trade_date <= as_of)
            .filter(|t| symbol.map_or(true, |s| t.matches_symbol(s)))
            .collect())
    }

    fn count_trades(&self) -> Result<i64> {
        self.check_read("count_trades")?;
        Ok(self.trades.lock().unwrap().len() as i64)
    }

    fn count_trades_before(&self, cutoff: NaiveDate) -> Result<i64> {
        self.check_read("count_trades_before")?;
        Ok(self
            .trades
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.trade_date < cutoff)
            .count() as i64)
    }

    fn count_duplicate_groups(&self) -> Result<i64> {
        self.check_read("count_duplicate_groups")?;
        let mut groups: HashMap<(String, NaiveDate, Decimal, Decimal, TradeType), usize> =
            HashMap::new();
        for t in self.trades.lock().unwrap().iter() {
            *groups
                .entry((
                    t.symbol.clone(),
                    t.trade_date,
                    t.quantity.normalize(),
                    t.price.normalize(),
                    t.trade_type,
                ))
                .or_default() += 1;
        }
        Ok(groups.values().filter(|count| **count > 1).count() as i64)
    }

    fn ping(&self) -> Result<()> {
        self.check_read("ping")
    }

    async fn create_trade(&self, trade: TradeInsert) -> Result<Trade> {
        self.insert_stamps.lock().unwrap().push(trade.created_at);
        self.begin_write()?;
        Ok(self.insert(trade))
    }

    async fn create_trades(&self, trades: Vec<TradeInsert>) -> Result<usize> {
        self.begin_write()?;
        let count = trades.len();
        for trade in trades {
            self.insert(trade);
        }
        Ok(count)
    }

    async fn replace_trade(&self, trade_id: i32, trade: TradeInsert) -> Result<Trade> {
        self.begin_write()?;
        self.remove(trade_id)?;
        Ok(self.insert(trade))
    }

    async fn delete_trade(&self, trade_id: i32) -> Result<Trade> {
        self.begin_write()?;
        self.remove(trade_id)
    }

    async fn update_trades(&self, updates: Vec<Trade>) -> Result<usize> {
        self.begin_write()?;
        let mut trades = self.trades.lock().unwrap();
        let mut updated = 0;
        for update in updates {
            if let Some(existing) = trades.iter_mut().find(|t| t.id == update.id) {
                *existing = update;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete_all_trades(&self) -> Result<usize> {
        self.begin_write()?;
        let mut trades = self.trades.lock().unwrap();
        let count = trades.len();
        trades.clear();
        Ok(count)
    }
}

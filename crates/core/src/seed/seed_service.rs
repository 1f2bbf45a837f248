use chrono::{Duration, NaiveDate};
use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use crate::errors::Result;
use crate::trades::{NewTrade, TradeRepositoryTrait, TradeType};
use crate::utils::time_utils::{months_before, Clock};

fn seed(
    symbol: &str,
    trade_type: TradeType,
    quantity: Decimal,
    price: Decimal,
    trade_date: NaiveDate,
) -> NewTrade {
    NewTrade::new(symbol, quantity, price, trade_type, trade_date)
}

/// Demo portfolio dated relative to `today`, starting six months back.
/// Sorted by trade date.
pub fn seed_trades(today: NaiveDate) -> Vec<NewTrade> {
    use TradeType::{Buy, Sell};

    let base = months_before(today, 6);
    let day = |start: NaiveDate, offset: i64| start + Duration::days(offset);

    // Initial positions
    let mut trades = vec![
        seed("AAPL", Buy, dec!(50), dec!(150.25), base),
        seed("MSFT", Buy, dec!(30), dec!(280.50), day(base, 2)),
        seed("GOOGL", Buy, dec!(15), dec!(2650.75), day(base, 5)),
        seed("TSLA", Buy, dec!(25), dec!(220.30), day(base, 7)),
        seed("NVDA", Buy, dec!(20), dec!(450.80), day(base, 10)),
    ];

    // Regular accumulation
    let start = day(base, 30);
    trades.extend([
        seed("AAPL", Buy, dec!(25), dec!(155.75), day(start, 15)),
        seed("MSFT", Buy, dec!(20), dec!(285.20), day(start, 20)),
        seed("AMZN", Buy, dec!(12), dec!(3200.45), day(start, 25)),
        seed("NVDA", Buy, dec!(15), dec!(475.60), day(start, 30)),
    ]);

    // Rebalancing
    let start = day(base, 90);
    trades.extend([
        seed("TSLA", Sell, dec!(10), dec!(245.80), day(start, 10)),
        seed("NVDA", Sell, dec!(8), dec!(520.25), day(start, 15)),
        seed("META", Buy, dec!(18), dec!(320.90), day(start, 20)),
        seed("JPM", Buy, dec!(35), dec!(145.60), day(start, 25)),
    ]);

    // Recent activity
    let start = day(base, 150);
    trades.extend([
        seed("AAPL", Buy, dec!(10), dec!(175.30), day(start, 5)),
        seed("GOOGL", Buy, dec!(5), dec!(2750.20), day(start, 10)),
        seed("AMD", Buy, dec!(40), dec!(95.75), day(start, 15)),
        seed("AMZN", Sell, dec!(3), dec!(3350.80), day(start, 20)),
        seed("MSFT", Buy, dec!(15), dec!(295.45), day(today, -3)),
    ]);

    trades.sort_by_key(|t| t.trade_date);
    trades
}

/// Loads the demo portfolio into an empty ledger.
pub struct SeedDataService {
    repository: Arc<dyn TradeRepositoryTrait>,
    clock: Arc<dyn Clock>,
}

impl SeedDataService {
    pub fn new(repository: Arc<dyn TradeRepositoryTrait>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Inserts the demo portfolio in one batch. Returns the number of trades
    /// inserted, 0 when the ledger already has data.
    pub async fn seed_data(&self) -> Result<usize> {
        if self.has_seed_data()? {
            info!("Seed data already exists. Skipping seed operation.");
            return Ok(0);
        }

        let created_at = self.clock.now();
        let inserts = seed_trades(self.clock.today())
            .iter()
            .map(|t| t.to_insert(created_at))
            .collect();
        let count = self.repository.create_trades(inserts).await?;
        info!("Seeded {} trades into the ledger", count);
        Ok(count)
    }

    /// True when the ledger holds any trade.
    pub fn has_seed_data(&self) -> Result<bool> {
        Ok(self.repository.count_trades()? > 0)
    }

    /// Removes every trade from the ledger.
    pub async fn clear_seed_data(&self) -> Result<usize> {
        let count = self.repository.delete_all_trades().await?;
        info!("Cleared {} trades from the ledger", count);
        Ok(count)
    }
}

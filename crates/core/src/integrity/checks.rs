//! Pure integrity scans over a list of trades.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::model::IntegrityConfig;
use crate::trades::Trade;
use crate::utils::format_utils::format_count;

/// Per-invariant counts of corrupted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorruptionScan {
    pub invalid_quantity: usize,
    pub invalid_price: usize,
    pub empty_symbol: usize,
    pub future_date: usize,
    pub long_symbol: usize,
}

impl CorruptionScan {
    pub fn scan(trades: &[Trade], today: NaiveDate, max_symbol_length: usize) -> Self {
        let mut scan = Self::default();
        for trade in trades {
            if trade.quantity <= Decimal::ZERO {
                scan.invalid_quantity += 1;
            }
            if trade.price <= Decimal::ZERO {
                scan.invalid_price += 1;
            }
            if trade.symbol.trim().is_empty() {
                scan.empty_symbol += 1;
            }
            if trade.trade_date > today {
                scan.future_date += 1;
            }
            if trade.symbol.chars().count() > max_symbol_length {
                scan.long_symbol += 1;
            }
        }
        scan
    }

    /// One message per invariant with at least one violation.
    pub fn issues(&self, max_symbol_length: usize) -> Vec<String> {
        let mut issues = Vec::new();
        if self.invalid_quantity > 0 {
            issues.push(format!(
                "Found {} trades with invalid quantities (≤ 0)",
                self.invalid_quantity
            ));
        }
        if self.invalid_price > 0 {
            issues.push(format!(
                "Found {} trades with invalid prices (≤ 0)",
                self.invalid_price
            ));
        }
        if self.empty_symbol > 0 {
            issues.push(format!(
                "Found {} trades with empty stock symbols",
                self.empty_symbol
            ));
        }
        if self.future_date > 0 {
            issues.push(format!(
                "Found {} trades with future dates",
                self.future_date
            ));
        }
        if self.long_symbol > 0 {
            issues.push(format!(
                "Found {} trades with stock symbols longer than {} characters",
                self.long_symbol, max_symbol_length
            ));
        }
        issues
    }
}

/// Size advisories for a ledger of `total_trades` records.
pub fn scale_warnings(total_trades: i64, config: &IntegrityConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if total_trades > config.large_ledger_threshold {
        warnings.push(format!(
            "Large number of trades ({}) may impact performance",
            format_count(total_trades)
        ));
    }
    if total_trades > config.index_advisory_threshold {
        warnings.push(
            "Consider adding database indexes for better performance with large datasets"
                .to_string(),
        );
    }
    warnings
}

/// Returns the repaired record when `trade` has an over-long symbol or a
/// future date, `None` when it needs no repair. Other corruption is left alone.
pub fn repair_trade(trade: &Trade, today: NaiveDate, max_symbol_length: usize) -> Option<Trade> {
    let mut repaired = trade.clone();
    let mut changed = false;

    if repaired.symbol.chars().count() > max_symbol_length {
        repaired.symbol = repaired.symbol.chars().take(max_symbol_length).collect();
        changed = true;
    }
    if repaired.trade_date > today {
        repaired.trade_date = today;
        changed = true;
    }

    changed.then_some(repaired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trades::test_support::{date, trade};
    use crate::trades::TradeType;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scan_counts_each_invariant() {
        let today = date(2024, 6, 30);
        let trades = vec![
            trade(1, "AAPL", TradeType::Buy, dec!(0), dec!(10), today),
            trade(2, "AAPL", TradeType::Buy, dec!(-1), dec!(-5), today),
            trade(3, " ", TradeType::Buy, dec!(1), dec!(10), today),
            trade(4, "VERYLONGSYMBOL", TradeType::Sell, dec!(1), dec!(10), date(2024, 7, 1)),
            trade(5, "MSFT", TradeType::Buy, dec!(1), dec!(10), today),
        ];

        let scan = CorruptionScan::scan(&trades, today, 10);
        assert_eq!(
            scan,
            CorruptionScan {
                invalid_quantity: 2,
                invalid_price: 1,
                empty_symbol: 1,
                future_date: 1,
                long_symbol: 1,
            }
        );
        assert_eq!(
            scan.issues(10),
            vec![
                "Found 2 trades with invalid quantities (≤ 0)",
                "Found 1 trades with invalid prices (≤ 0)",
                "Found 1 trades with empty stock symbols",
                "Found 1 trades with future dates",
                "Found 1 trades with stock symbols longer than 10 characters",
            ]
        );
    }

    #[test]
    fn test_clean_ledger_has_no_issues() {
        let today = date(2024, 6, 30);
        let trades = vec![trade(1, "AAPL", TradeType::Buy, dec!(1), dec!(10), today)];
        assert!(CorruptionScan::scan(&trades, today, 10).issues(10).is_empty());
    }

    #[test]
    fn test_scale_warnings() {
        let config = IntegrityConfig::default();
        assert!(scale_warnings(1_000, &config).is_empty());
        assert_eq!(scale_warnings(1_001, &config).len(), 1);
        assert_eq!(
            scale_warnings(12_345, &config),
            vec![
                "Large number of trades (12,345) may impact performance",
                "Consider adding database indexes for better performance with large datasets",
            ]
        );
    }

    #[test]
    fn test_repair_trade() {
        let today = date(2024, 6, 30);

        let long = trade(1, "ABCDEFGHIJKL", TradeType::Buy, dec!(1), dec!(1), date(2024, 8, 1));
        let repaired = repair_trade(&long, today, 10).unwrap();
        assert_eq!(repaired.symbol, "ABCDEFGHIJ");
        assert_eq!(repaired.trade_date, today);
        assert_eq!(repaired.id, 1);

        let bad_quantity = trade(2, "AAPL", TradeType::Buy, dec!(0), dec!(1), today);
        assert!(repair_trade(&bad_quantity, today, 10).is_none());
    }
}

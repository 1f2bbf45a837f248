#[cfg(test)]
mod tests {
    use crate::errors::Error;
    use crate::portfolio::holdings::{HoldingsCalculator, PositionState};
    use crate::trades::test_support::{date, stamp, trade};
    use crate::trades::{Trade, TradeType};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn buy(id: i32, symbol: &str, qty: Decimal, price: Decimal, day: u32) -> Trade {
        trade(id, symbol, TradeType::Buy, qty, price, date(2024, 3, day))
    }

    fn sell(id: i32, symbol: &str, qty: Decimal, price: Decimal, day: u32) -> Trade {
        trade(id, symbol, TradeType::Sell, qty, price, date(2024, 3, day))
    }

    #[test]
    fn test_single_buy() {
        let holdings =
            HoldingsCalculator::replay(&[buy(1, "AAPL", dec!(10), dec!(150), 1)]).unwrap();

        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].symbol, "AAPL");
        assert_eq!(holdings[0].quantity, dec!(10));
        assert_eq!(holdings[0].average_cost_basis, dec!(150));
        assert_eq!(holdings[0].total_value, dec!(1500));
    }

    #[test]
    fn test_buys_compute_weighted_average() {
        let holdings = HoldingsCalculator::replay(&[
            buy(1, "AAPL", dec!(10), dec!(100), 1),
            buy(2, "AAPL", dec!(20), dec!(150), 2),
        ])
        .unwrap();

        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].quantity, dec!(30));
        assert_eq!(holdings[0].average_cost_basis.round_dp(2), dec!(133.33));
    }

    #[test]
    fn test_sell_keeps_cost_basis() {
        let holdings = HoldingsCalculator::replay(&[
            buy(1, "AAPL", dec!(20), dec!(150), 1),
            sell(2, "AAPL", dec!(5), dec!(160), 2),
        ])
        .unwrap();

        assert_eq!(holdings[0].quantity, dec!(15));
        assert_eq!(holdings[0].average_cost_basis, dec!(150));
        assert_eq!(holdings[0].total_value, dec!(2250));
    }

    #[test]
    fn test_full_liquidation_drops_symbol() {
        let holdings = HoldingsCalculator::replay(&[
            buy(1, "AAPL", dec!(10), dec!(150), 1),
            sell(2, "AAPL", dec!(10), dec!(160), 2),
        ])
        .unwrap();

        assert!(holdings.is_empty());
    }

    #[test]
    fn test_rebuy_after_liquidation_starts_fresh_cost() {
        let holdings = HoldingsCalculator::replay(&[
            buy(1, "AAPL", dec!(10), dec!(100), 1),
            sell(2, "AAPL", dec!(10), dec!(120), 2),
            buy(3, "AAPL", dec!(4), dec!(200), 3),
        ])
        .unwrap();

        assert_eq!(holdings[0].quantity, dec!(4));
        assert_eq!(holdings[0].average_cost_basis, dec!(200));
    }

    #[test]
    fn test_oversell_resets_mid_replay() {
        // The snapshot path resets at the oversell, so the later buy starts from zero.
        let trades = [
            buy(1, "TSLA", dec!(5), dec!(100), 1),
            sell(2, "TSLA", dec!(8), dec!(110), 2),
            buy(3, "TSLA", dec!(4), dec!(90), 3),
        ];

        let holdings = HoldingsCalculator::replay(&trades).unwrap();
        assert_eq!(holdings[0].quantity, dec!(4));
        assert_eq!(holdings[0].average_cost_basis, dec!(90));

        // The quantity path carries the -3 and only clamps the final value.
        assert_eq!(HoldingsCalculator::replay_quantity(&trades, "TSLA").unwrap(), dec!(1));
    }

    #[test]
    fn test_replay_quantity_clamps_at_zero() {
        let trades = [
            buy(1, "TSLA", dec!(5), dec!(100), 1),
            sell(2, "TSLA", dec!(8), dec!(110), 2),
        ];
        assert_eq!(
            HoldingsCalculator::replay_quantity(&trades, "TSLA").unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_symbols_are_case_insensitive() {
        let trades = [
            buy(1, "aapl", dec!(10), dec!(100), 1),
            buy(2, "AAPL", dec!(10), dec!(200), 2),
        ];

        let holdings = HoldingsCalculator::replay(&trades).unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].symbol, "AAPL");
        assert_eq!(holdings[0].quantity, dec!(20));
        assert_eq!(holdings[0].average_cost_basis, dec!(150));
        assert_eq!(HoldingsCalculator::replay_quantity(&trades, "Aapl").unwrap(), dec!(20));
    }

    #[test]
    fn test_two_symbols_sorted_regardless_of_insertion() {
        let msft = buy(1, "MSFT", dec!(3), dec!(300), 5);
        let aapl = buy(2, "AAPL", dec!(7), dec!(150), 5);

        let as_of = date(2024, 3, 5);
        let forward =
            HoldingsCalculator::snapshot_as_of(&[msft.clone(), aapl.clone()], as_of).unwrap();
        let backward = HoldingsCalculator::snapshot_as_of(&[aapl, msft], as_of).unwrap();

        assert_eq!(forward, backward);
        let symbols: Vec<_> = forward.iter().map(|h| h.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_same_day_trades_ordered_by_created_at() {
        let mut first = buy(2, "NVDA", dec!(10), dec!(100), 4);
        first.created_at = stamp(2024, 3, 4, 9, 0);
        let mut second = sell(1, "NVDA", dec!(10), dec!(110), 4);
        second.created_at = stamp(2024, 3, 4, 10, 0);
        let mut third = buy(3, "NVDA", dec!(2), dec!(120), 4);
        third.created_at = stamp(2024, 3, 4, 11, 0);

        // Passed out of order; the snapshot sorts by (trade_date, created_at).
        let holdings =
            HoldingsCalculator::snapshot_as_of(&[third, second, first], date(2024, 3, 4)).unwrap();
        assert_eq!(holdings[0].quantity, dec!(2));
        assert_eq!(holdings[0].average_cost_basis, dec!(120));
    }

    #[test]
    fn test_as_of_is_inclusive() {
        let trades = [
            buy(1, "AMD", dec!(10), dec!(90), 1),
            buy(2, "AMD", dec!(5), dec!(100), 10),
            buy(3, "AMD", dec!(5), dec!(110), 11),
        ];

        assert_eq!(
            HoldingsCalculator::quantity_as_of(&trades, "AMD", date(2024, 3, 10)).unwrap(),
            dec!(15)
        );
        assert_eq!(
            HoldingsCalculator::quantity_as_of(&trades, "AMD", date(2024, 2, 28)).unwrap(),
            Decimal::ZERO
        );
        assert!(HoldingsCalculator::snapshot_as_of(&trades, date(2024, 2, 28))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_position_state_buy_from_empty() {
        let mut state = PositionState::default();
        state.apply(TradeType::Buy, dec!(2.5), dec!(40)).unwrap();
        assert_eq!(state.quantity, dec!(2.5));
        assert_eq!(state.average_cost_basis, dec!(40));
    }

    #[test]
    fn test_value_overflow_is_an_error() {
        let trades = [buy(1, "AAPL", dec!(100000000000000000000), dec!(1000000000), 1)];

        let err = HoldingsCalculator::replay(&trades).unwrap_err();
        assert!(matches!(err, Error::Calculation(_)));
        // The quantity alone is representable.
        assert_eq!(
            HoldingsCalculator::replay_quantity(&trades, "AAPL").unwrap(),
            dec!(100000000000000000000)
        );
    }

    #[test]
    fn test_quantity_overflow_is_an_error() {
        let trades = [
            buy(1, "AAPL", Decimal::MAX, dec!(0.0001), 1),
            buy(2, "AAPL", Decimal::MAX, dec!(0.0001), 2),
        ];

        assert!(matches!(
            HoldingsCalculator::replay_quantity(&trades, "AAPL"),
            Err(Error::Calculation(_))
        ));
        assert!(HoldingsCalculator::replay(&trades).is_err());
    }

    #[test]
    fn test_position_state_unchanged_on_overflow() {
        let mut state = PositionState::default();
        state.apply(TradeType::Buy, dec!(10), dec!(5)).unwrap();

        assert!(state.apply(TradeType::Buy, Decimal::MAX, dec!(2)).is_none());
        assert_eq!(state.quantity, dec!(10));
        assert_eq!(state.average_cost_basis, dec!(5));
    }
}

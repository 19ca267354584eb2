//! End-to-end tests over the domain pipeline.
//!
//! Tests cover:
//! - Hand-built signal scenarios through the simulator and metrics
//! - Constant-price and open-position behavior
//! - Split, sweep and optimize through a mock data port
//! - Properties: simulator determinism, crossover exclusivity and
//!   definedness, split reconstruction

mod common;

use approx::assert_abs_diff_eq;
use common::*;
use proptest::prelude::*;
use smacross::domain::backtest::{run_backtest, run_crossover};
use smacross::domain::baseline::BaselineReport;
use smacross::domain::error::BacktestError;
use smacross::domain::indicator::{SignalColumn, crossover, crossunder, moving_average};
use smacross::domain::metrics::{Metric, MetricsReport};
use smacross::domain::position::Position;
use smacross::domain::simulator::simulate;
use smacross::domain::split::split;
use smacross::domain::sweep::{optimize, sweep};
use smacross::ports::data_port::DataPort;

const TEN_BARS: [f64; 10] = [100.0, 101.0, 102.0, 101.0, 100.0, 99.0, 98.0, 99.0, 100.0, 101.0];

mod simulator_scenarios {
    use super::*;

    #[test]
    fn single_losing_trade() {
        let series = series_from_closes(&TEN_BARS);
        let entry = SignalColumn::from_indices("entry", 10, &[2]);
        let exit = SignalColumn::from_indices("exit", 10, &[6]);

        let sim = simulate(&series, &entry, &exit);

        assert_eq!(sim.ledger.len(), 1);
        let trade = &sim.ledger[0];
        assert_eq!(trade.entry_price, 102.0);
        assert_eq!(trade.exit_price, 98.0);
        assert_eq!(trade.entry_date, date(2020, 1, 3));
        assert_eq!(trade.exit_date, date(2020, 1, 7));
        assert_abs_diff_eq!(trade.trade_return, -4.0 / 102.0, epsilon = 1e-12);

        let report = MetricsReport::from_ledger(&sim.ledger, 0.0);
        assert_abs_diff_eq!(report.cumulative_return, -0.0392, epsilon = 1e-4);
        assert_eq!(report.trade_count, 1);
        assert_eq!(report.loss_count, 1);
        // One sample has no sample variance.
        assert!(report.annualized_volatility.is_undefined());
        assert_eq!(report.sharpe_ratio, Metric::Undefined);
    }

    #[test]
    fn unclosed_position_excluded_from_ledger_and_return() {
        let series = series_from_closes(&TEN_BARS);
        let entry = SignalColumn::from_indices("entry", 10, &[0, 7]);
        let exit = SignalColumn::from_indices("exit", 10, &[2]);

        let sim = simulate(&series, &entry, &exit);

        // Two opens, one close.
        assert_eq!(sim.ledger.len(), 1);
        assert!(matches!(
            sim.open_position,
            Position::Long { entry_price, .. } if entry_price == 99.0
        ));
        assert_abs_diff_eq!(
            MetricsReport::from_ledger(&sim.ledger, 0.0).cumulative_return,
            0.02,
            epsilon = 1e-12
        );
    }

    #[test]
    fn only_open_position_gives_zero_return() {
        let series = series_from_closes(&TEN_BARS);
        let entry = SignalColumn::from_indices("entry", 10, &[3]);
        let exit = SignalColumn::from_indices("exit", 10, &[]);

        let sim = simulate(&series, &entry, &exit);
        let report = MetricsReport::from_ledger(&sim.ledger, 0.0);

        assert!(sim.ledger.is_empty());
        assert!(sim.open_position.is_long());
        assert_eq!(report.cumulative_return, 0.0);
        assert_eq!(report.trade_count, 0);
        assert!(report.annualized_return.is_undefined());
    }
}

mod constant_price {
    use super::*;

    #[test]
    fn baselines_are_flat_with_undefined_sharpe() {
        let series = series_from_closes(&[50.0; 40]);
        let baseline = BaselineReport::compute(&series, 0.02);

        for report in [&baseline.buy_and_hold, &baseline.overnight] {
            assert_eq!(report.cumulative_return, 0.0);
            assert_eq!(report.annualized_return, Metric::Computed(0.0));
            assert_eq!(report.annualized_volatility, Metric::Computed(0.0));
            assert_eq!(report.sharpe_ratio, Metric::Undefined);
        }
    }

    #[test]
    fn long_flat_series_never_crosses() {
        let series = series_from_closes(&vec![100.1; 2000]);
        let fast = moving_average(&series, 10);
        let slow = moving_average(&series, 50);

        assert!(crossover(&fast, &slow).values.iter().all(|&s| !s));
        assert!(crossunder(&fast, &slow).values.iter().all(|&s| !s));
        assert!(run_crossover(&series, 10, 50, 0.0).ledger.is_empty());
    }

    #[test]
    fn crossover_strategy_never_trades() {
        let series = series_from_closes(&[50.0; 40]);
        let result = run_crossover(&series, 3, 10, 0.0);

        assert!(result.ledger.is_empty());
        assert_eq!(result.report.cumulative_return, 0.0);
        assert!(result.cumulative.iter().all(|&c| c == 0.0));
    }
}

mod indicators {
    use super::*;

    #[test]
    fn moving_average_of_one_to_five() {
        let series = series_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let sma = moving_average(&series, 3);
        assert_eq!(sma.values, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn golden_and_death_cross_round_trip() {
        let closes = [10.0, 10.0, 10.0, 12.0, 14.0, 16.0, 12.0, 8.0, 6.0, 6.0];
        let series = series_from_closes(&closes);
        let result = run_crossover(&series, 1, 3, 0.0);

        assert_eq!(result.ledger.len(), 1);
        assert_eq!(result.ledger[0].entry_price, 12.0);
        assert_eq!(result.ledger[0].exit_price, 12.0);
        assert_eq!(result.report.cumulative_return, 0.0);
    }
}

mod full_pipeline {
    use super::*;

    #[test]
    fn fetch_backtest_from_mock_port() {
        let port = MockDataPort::new().with_bars("SPY", bars_from_closes("2020-01-01", &wave_closes(200)));
        let series = port
            .fetch_series("SPY", date(2020, 1, 1), date(2020, 12, 31))
            .unwrap();

        assert_eq!(series.symbol(), "SPY");
        assert_eq!(series.len(), 200);

        let config = small_strategy();
        let result = run_backtest(&series, &config);
        assert!(result.report.trade_count > 0);
        assert_eq!(result.cumulative.len(), series.len());
        assert_abs_diff_eq!(
            *result.cumulative.last().unwrap(),
            result.report.cumulative_return,
            epsilon = 1e-12
        );
        assert_eq!(result, run_backtest(&series, &config));
    }

    #[test]
    fn date_range_is_inclusive() {
        let port = MockDataPort::new().with_bars("SPY", bars_from_closes("2020-01-01", &wave_closes(30)));
        let series = port
            .fetch_series("SPY", date(2020, 1, 5), date(2020, 1, 10))
            .unwrap();
        assert_eq!(series.len(), 6);
        assert_eq!(series.first_date(), Some(date(2020, 1, 5)));
        assert_eq!(series.last_date(), Some(date(2020, 1, 10)));
    }

    #[test]
    fn empty_range_is_data_unavailable() {
        let port = MockDataPort::new().with_bars("SPY", bars_from_closes("2020-01-01", &wave_closes(30)));
        let err = port
            .fetch_series("SPY", date(2021, 1, 1), date(2021, 12, 31))
            .unwrap_err();
        assert!(matches!(err, BacktestError::DataUnavailable { .. }));
    }

    #[test]
    fn port_error_propagates() {
        let port = MockDataPort::new().with_error("SPY", "feed offline");
        let err = port
            .fetch_series("SPY", date(2020, 1, 1), date(2020, 12, 31))
            .unwrap_err();
        assert!(matches!(err, BacktestError::DataUnavailable { reason, .. } if reason == "feed offline"));
    }

    #[test]
    fn sweep_without_crossovers_is_not_an_error() {
        let series = series_from_closes(&[100.0; 60]);
        let results = sweep(&series, &[20, 50], &[10]).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!((results[0].long_window, results[0].short_window), (20, 10));
        assert_eq!((results[1].long_window, results[1].short_window), (50, 10));
        for r in &results {
            assert_eq!(r.cumulative_return, 0.0);
            assert_eq!(r.trade_count, 0);
        }
    }

    #[test]
    fn optimize_trains_and_validates_on_disjoint_splits() {
        let series = series_from_closes(&wave_closes(300));
        let config = small_strategy();

        let outcome = optimize(&series, &config).unwrap();

        assert_eq!(outcome.train.len(), 195);
        assert_eq!(outcome.test.len(), 105);
        assert!(outcome.train.last_date() < outcome.test.first_date());
        assert_eq!(outcome.grid.len(), 6);

        let best = outcome.best.as_ref().unwrap();
        assert!(
            outcome
                .grid
                .iter()
                .all(|r| r.cumulative_return <= best.cumulative_return)
        );
        let validation = outcome.validation.as_ref().unwrap();
        assert_eq!(validation.per_bar_return.len(), outcome.test.len());
    }
}

mod splitting {
    use super::*;

    #[test]
    fn hundred_bars_at_065() {
        let series = series_from_closes(&wave_closes(100));
        let (train, test) = split(&series, 0.65).unwrap();

        assert_eq!(train.len(), 65);
        assert_eq!(test.len(), 35);
        let rejoined: Vec<_> = train.bars().iter().chain(test.bars()).cloned().collect();
        assert_eq!(rejoined, series.bars());
    }
}

fn closes_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..500.0, 2..120)
}

proptest! {
    #[test]
    fn simulate_is_deterministic(closes in closes_strategy(), short in 1usize..8, long in 2usize..20) {
        let series = series_from_closes(&closes);
        let fast = moving_average(&series, short);
        let slow = moving_average(&series, long);
        let entry = crossover(&fast, &slow);
        let exit = crossunder(&fast, &slow);

        let first = simulate(&series, &entry, &exit);
        let second = simulate(&series, &entry, &exit);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn crossover_and_crossunder_are_exclusive_and_defined(
        closes in closes_strategy(),
        short in 1usize..8,
        long in 2usize..20,
    ) {
        let series = series_from_closes(&closes);
        let fast = moving_average(&series, short);
        let slow = moving_average(&series, long);
        let above = crossover(&fast, &slow);
        let below = crossunder(&fast, &slow);

        prop_assert_eq!(above.len(), series.len());
        prop_assert_eq!(below.len(), series.len());
        for i in 0..series.len() {
            prop_assert!(!(above.is_set(i) && below.is_set(i)));
            if above.is_set(i) || below.is_set(i) {
                prop_assert!(i >= 1);
                prop_assert!(fast.get(i).is_some() && slow.get(i).is_some());
                prop_assert!(fast.get(i - 1).is_some() && slow.get(i - 1).is_some());
            }
        }
    }

    #[test]
    fn ledger_trades_never_overlap(closes in closes_strategy(), short in 1usize..8, long in 2usize..20) {
        let series = series_from_closes(&closes);
        let result = run_crossover(&series, short, long, 0.0);

        for pair in result.ledger.windows(2) {
            prop_assert!(pair[0].exit_date < pair[1].entry_date);
        }
        for trade in &result.ledger {
            prop_assert!(trade.entry_date < trade.exit_date);
        }
    }

    #[test]
    fn split_reconstructs_series(closes in prop::collection::vec(1.0f64..500.0, 10..120), fraction in 0.1f64..0.9) {
        let series = series_from_closes(&closes);
        let (train, test) = split(&series, fraction).unwrap();

        prop_assert_eq!(train.len(), (series.len() as f64 * fraction).floor() as usize);
        prop_assert_eq!(train.len() + test.len(), series.len());
        let rejoined: Vec<_> = train.bars().iter().chain(test.bars()).cloned().collect();
        prop_assert_eq!(rejoined.as_slice(), series.bars());
    }
}

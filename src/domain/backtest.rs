//! Crossover backtest pipeline and strategy parameters.
//!
//! `run_crossover` is the single path from a price series and a window pair
//! to a trade ledger and report. The sweep, the held-out validation and the
//! `backtest` command all go through it.

use tracing::{info, warn};

use crate::domain::indicator::{IndicatorColumn, crossover, crossunder, moving_average};
use crate::domain::metrics::{MetricsReport, cumulative_series};
use crate::domain::position::{Position, Trade};
use crate::domain::series::PriceSeries;
use crate::domain::simulator::simulate;

pub const DEFAULT_SHORT_WINDOW: usize = 20;
pub const DEFAULT_LONG_WINDOW: usize = 50;
pub const DEFAULT_SHORT_WINDOWS: [usize; 3] = [10, 20, 50];
pub const DEFAULT_LONG_WINDOWS: [usize; 3] = [50, 100, 200];
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.65;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.0;

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub short_window: usize,
    pub long_window: usize,
    pub short_windows: Vec<usize>,
    pub long_windows: Vec<usize>,
    pub train_fraction: f64,
    pub risk_free_rate: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
            short_windows: DEFAULT_SHORT_WINDOWS.to_vec(),
            long_windows: DEFAULT_LONG_WINDOWS.to_vec(),
            train_fraction: DEFAULT_TRAIN_FRACTION,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub short_window: usize,
    pub long_window: usize,
    pub ledger: Vec<Trade>,
    pub per_bar_return: IndicatorColumn,
    /// Compounded realized return at each bar.
    pub cumulative: Vec<f64>,
    pub report: MetricsReport,
    /// Unrealized position left at the end of the series, if any.
    pub open_position: Position,
}

/// Enter on SMA(short) crossing above SMA(long), exit on the cross back below.
///
/// All indicator and signal columns are derived fresh from `series` on every
/// call, so repeated calls never observe each other's state.
pub fn run_crossover(series: &PriceSeries, short_window: usize, long_window: usize, risk_free_rate: f64) -> BacktestResult {
    let fast = moving_average(series, short_window);
    let slow = moving_average(series, long_window);
    let entry = crossover(&fast, &slow);
    let exit = crossunder(&fast, &slow);

    let sim = simulate(series, &entry, &exit);
    let report = MetricsReport::from_ledger(&sim.ledger, risk_free_rate);
    let cumulative = cumulative_series(&sim.per_bar_return);

    if sim.ledger.is_empty() {
        warn!(
            symbol = series.symbol(),
            short_window, long_window, "no completed trades"
        );
    }

    BacktestResult {
        short_window,
        long_window,
        ledger: sim.ledger,
        per_bar_return: sim.per_bar_return,
        cumulative,
        report,
        open_position: sim.open_position,
    }
}

/// `run_crossover` with a summary log line, used by the command entry points.
pub fn run_backtest(series: &PriceSeries, config: &StrategyConfig) -> BacktestResult {
    info!(
        symbol = series.symbol(),
        bars = series.len(),
        short_window = config.short_window,
        long_window = config.long_window,
        "running crossover backtest"
    );
    let result = run_crossover(series, config.short_window, config.long_window, config.risk_free_rate);
    info!(
        trades = result.report.trade_count,
        cumulative_return = result.report.cumulative_return,
        "backtest complete"
    );
    result
}

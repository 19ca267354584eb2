//! Grid search over moving-average window pairs with held-out validation.
//!
//! Every trial reads the same immutable training series and derives its own
//! indicator and signal columns through `run_crossover`; no trial can see
//! another's intermediate data. With the `parallel` feature trials run on the
//! rayon pool, and results are still returned in grid order.

use tracing::{debug, info};

use crate::domain::backtest::{BacktestResult, StrategyConfig, run_crossover};
use crate::domain::error::BacktestError;
use crate::domain::series::PriceSeries;
use crate::domain::split::split;

#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub long_window: usize,
    pub short_window: usize,
    pub cumulative_return: f64,
    pub trade_count: usize,
}

/// Run one crossover backtest per (long, short) pair.
///
/// Order: outer loop over `long_windows`, inner over `short_windows`, both in
/// the order given. Fails with `InvalidWindow` if any window is zero.
pub fn sweep(train: &PriceSeries, long_windows: &[usize], short_windows: &[usize]) -> Result<Vec<SweepResult>, BacktestError> {
    if let Some(w) = long_windows.iter().chain(short_windows).find(|&&w| w == 0) {
        return Err(BacktestError::InvalidWindow {
            reason: format!("window {w} must be at least 1"),
        });
    }

    let grid: Vec<(usize, usize)> = long_windows
        .iter()
        .flat_map(|&long| short_windows.iter().map(move |&short| (long, short)))
        .collect();

    info!(
        symbol = train.symbol(),
        bars = train.len(),
        trials = grid.len(),
        "starting parameter sweep"
    );

    Ok(run_trials(train, &grid))
}

#[cfg(not(feature = "parallel"))]
fn run_trials(train: &PriceSeries, grid: &[(usize, usize)]) -> Vec<SweepResult> {
    grid.iter().map(|&(long, short)| run_trial(train, long, short)).collect()
}

#[cfg(feature = "parallel")]
fn run_trials(train: &PriceSeries, grid: &[(usize, usize)]) -> Vec<SweepResult> {
    use rayon::prelude::*;

    grid.par_iter()
        .map(|&(long, short)| run_trial(train, long, short))
        .collect()
}

fn run_trial(train: &PriceSeries, long_window: usize, short_window: usize) -> SweepResult {
    // Risk-free rate does not enter the cumulative return.
    let result = run_crossover(train, short_window, long_window, 0.0);
    debug!(
        long_window,
        short_window,
        trades = result.report.trade_count,
        cumulative_return = result.report.cumulative_return,
        "sweep trial"
    );
    SweepResult {
        long_window,
        short_window,
        cumulative_return: result.report.cumulative_return,
        trade_count: result.report.trade_count,
    }
}

/// Highest cumulative return; the first encountered wins ties.
pub fn best(results: &[SweepResult]) -> Option<&SweepResult> {
    results.iter().fold(None, |best: Option<&SweepResult>, r| match best {
        Some(b) if b.cumulative_return >= r.cumulative_return => Some(b),
        _ => Some(r),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    pub train: PriceSeries,
    pub test: PriceSeries,
    pub grid: Vec<SweepResult>,
    pub best: Option<SweepResult>,
    /// The best pair re-run on the held-out test split.
    pub validation: Option<BacktestResult>,
}

/// Split, sweep the training part, then re-run the winner on the test part.
pub fn optimize(series: &PriceSeries, config: &StrategyConfig) -> Result<OptimizationOutcome, BacktestError> {
    let (train, test) = split(series, config.train_fraction)?;
    let grid = sweep(&train, &config.long_windows, &config.short_windows)?;
    let best = best(&grid).cloned();

    let validation = best.as_ref().map(|b| {
        info!(
            long_window = b.long_window,
            short_window = b.short_window,
            train_return = b.cumulative_return,
            "validating best configuration on test split"
        );
        run_crossover(&test, b.short_window, b.long_window, config.risk_free_rate)
    });

    Ok(OptimizationOutcome {
        train,
        test,
        grid,
        best,
        validation,
    })
}

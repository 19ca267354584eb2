//! Contiguous train/test split by index fraction.

use crate::domain::error::BacktestError;
use crate::domain::series::PriceSeries;

/// Split into `series[0..k]` and `series[k..n]` with `k = floor(n * train_fraction)`.
///
/// Fails with `InvalidSplitFraction` when `n < 2`, when the fraction is not
/// strictly inside (0, 1), or when either side would be empty.
pub fn split(series: &PriceSeries, train_fraction: f64) -> Result<(PriceSeries, PriceSeries), BacktestError> {
    let n = series.len();

    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(BacktestError::InvalidSplitFraction {
            reason: format!("train fraction {train_fraction} must be strictly between 0 and 1"),
        });
    }
    if n < 2 {
        return Err(BacktestError::InvalidSplitFraction {
            reason: format!("series has {n} bars, need at least 2 to split"),
        });
    }

    let k = (n as f64 * train_fraction).floor() as usize;
    if k == 0 || k >= n {
        return Err(BacktestError::InvalidSplitFraction {
            reason: format!("train fraction {train_fraction} leaves an empty side for {n} bars"),
        });
    }

    Ok((series.slice(0..k)?, series.slice(k..n)?))
}

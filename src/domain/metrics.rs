//! Performance metrics over a return sequence.
//!
//! The same formulas apply to dense per-bar returns and to sparse per-trade
//! returns. Annualization always compounds the mean return over 252 periods,
//! even for trade returns where a "period" is a whole trade rather than a day.

use std::fmt;

use crate::domain::indicator::IndicatorColumn;
use crate::domain::position::Trade;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// A statistic that is either computed or undefined for lack of data
/// (empty sample, single observation, or zero variance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Computed(f64),
    Undefined,
}

impl Metric {
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Computed(v) => Some(*v),
            Metric::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Metric::Undefined)
    }
}

impl From<Option<f64>> for Metric {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Metric::Computed(v),
            _ => Metric::Undefined,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Computed(v) => fmt::Display::fmt(v, f),
            Metric::Undefined => f.pad("n/a"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsReport {
    pub cumulative_return: f64,
    pub annualized_return: Metric,
    pub annualized_volatility: Metric,
    pub sharpe_ratio: Metric,
    pub trade_count: usize,
    pub win_count: usize,
    pub loss_count: usize,
}

impl MetricsReport {
    /// Statistics over a plain return sequence. Trade counts are zero.
    pub fn from_returns(returns: &[f64], risk_free_rate: f64) -> Self {
        let annualized_return = annualized_return(returns);
        let annualized_volatility = annualized_volatility(returns);
        let sharpe_ratio = sharpe_ratio(annualized_return, annualized_volatility, risk_free_rate);

        MetricsReport {
            cumulative_return: cumulative_return(returns),
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            trade_count: 0,
            win_count: 0,
            loss_count: 0,
        }
    }

    /// Statistics over a trade ledger's per-trade returns, plus win/loss partition.
    pub fn from_ledger(trades: &[Trade], risk_free_rate: f64) -> Self {
        let returns: Vec<f64> = trades.iter().map(|t| t.trade_return).collect();
        MetricsReport {
            trade_count: trades.len(),
            win_count: trades.iter().filter(|t| t.is_win()).count(),
            loss_count: trades.iter().filter(|t| t.is_loss()).count(),
            ..Self::from_returns(&returns, risk_free_rate)
        }
    }

    pub fn breakeven_count(&self) -> usize {
        self.trade_count - self.win_count - self.loss_count
    }

    pub fn win_rate(&self) -> Metric {
        if self.trade_count == 0 {
            Metric::Undefined
        } else {
            Metric::Computed(self.win_count as f64 / self.trade_count as f64)
        }
    }
}

/// product(1 + r) - 1. An empty sequence compounds to 0.
pub fn cumulative_return(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

/// (1 + mean(r))^252 - 1
pub fn annualized_return(returns: &[f64]) -> Metric {
    mean(returns)
        .map(|m| (1.0 + m).powf(TRADING_DAYS_PER_YEAR) - 1.0)
        .into()
}

/// Sample standard deviation (n - 1) scaled by sqrt(252).
pub fn annualized_volatility(returns: &[f64]) -> Metric {
    sample_stddev(returns)
        .map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt())
        .into()
}

pub fn sharpe_ratio(annualized_return: Metric, annualized_volatility: Metric, risk_free_rate: f64) -> Metric {
    match (annualized_return, annualized_volatility) {
        (Metric::Computed(ret), Metric::Computed(vol)) if vol > 0.0 => {
            Some((ret - risk_free_rate) / vol).into()
        }
        _ => Metric::Undefined,
    }
}

/// Compound the defined entries of a per-bar return column, carrying the
/// running value across undefined bars. Bars before the first realized
/// return are 0.
pub fn cumulative_series(per_bar: &IndicatorColumn) -> Vec<f64> {
    let mut growth = 1.0_f64;
    per_bar
        .values
        .iter()
        .map(|r| {
            if let Some(r) = r {
                growth *= 1.0 + r;
            }
            growth - 1.0
        })
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Identical samples give exactly 0.
fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    if values.iter().all(|&v| v == values[0]) {
        return Some(0.0);
    }
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

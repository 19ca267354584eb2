//! Baseline return streams: buy-and-hold and overnight-only.

use crate::domain::metrics::MetricsReport;
use crate::domain::series::PriceSeries;

/// Close-to-close returns for bars 1..n. Empty for a one-bar series.
pub fn buy_and_hold_returns(series: &PriceSeries) -> Vec<f64> {
    series
        .bars()
        .windows(2)
        .map(|w| w[1].close_return(w[0].close))
        .collect()
}

/// Previous-close-to-open returns for bars 1..n. Empty for a one-bar series.
pub fn overnight_returns(series: &PriceSeries) -> Vec<f64> {
    series
        .bars()
        .windows(2)
        .map(|w| w[1].overnight_return(w[0].close))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaselineReport {
    pub buy_and_hold: MetricsReport,
    pub overnight: MetricsReport,
}

impl BaselineReport {
    pub fn compute(series: &PriceSeries, risk_free_rate: f64) -> Self {
        BaselineReport {
            buy_and_hold: MetricsReport::from_returns(&buy_and_hold_returns(series), risk_free_rate),
            overnight: MetricsReport::from_returns(&overnight_returns(series), risk_free_rate),
        }
    }
}

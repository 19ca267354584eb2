//! Simple Moving Average of closing prices.
//!
//! SMA(n)[i] = (C[i-n+1] + ... + C[i]) / n
//!
//! Each window is summed afresh as offsets from its first close, so a flat
//! stretch averages to exactly that close whatever the window length.
//! Warmup: first (n-1) bars are undefined. A window longer than the series
//! (or a zero window) yields an entirely undefined column.

use crate::domain::indicator::{IndicatorColumn, IndicatorType};
use crate::domain::series::PriceSeries;

pub fn moving_average(series: &PriceSeries, window: usize) -> IndicatorColumn {
    moving_average_of(&series.closes(), window)
}

pub(crate) fn moving_average_of(closes: &[f64], window: usize) -> IndicatorColumn {
    let mut values = Vec::with_capacity(closes.len());

    if window == 0 {
        values.resize(closes.len(), None);
        return IndicatorColumn {
            indicator_type: IndicatorType::Sma(window),
            values,
        };
    }

    for i in 0..closes.len() {
        if i + 1 < window {
            values.push(None);
            continue;
        }
        let slice = &closes[i + 1 - window..=i];
        let base = slice[0];
        let offset: f64 = slice.iter().map(|c| c - base).sum();
        values.push(Some(base + offset / window as f64));
    }

    IndicatorColumn {
        indicator_type: IndicatorType::Sma(window),
        values,
    }
}

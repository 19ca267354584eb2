//! Validated, date-ordered price history for a single instrument.

use std::ops::Range;

use chrono::NaiveDate;

use crate::domain::bar::Bar;
use crate::domain::error::BacktestError;

/// Ordered daily bars with strictly increasing dates and finite, positive prices.
///
/// Immutable once constructed. Slicing copies bars into a new series and never
/// touches the original.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, BacktestError> {
        let symbol = symbol.into();

        if bars.is_empty() {
            return Err(BacktestError::invalid_series(format!(
                "{symbol}: series is empty"
            )));
        }

        for (i, bar) in bars.iter().enumerate() {
            if let Some(field) = bar.invalid_price_field() {
                return Err(BacktestError::invalid_series(format!(
                    "{symbol}: {field} on {} is not a positive finite number",
                    bar.date
                )));
            }
            if i > 0 {
                let prev = bars[i - 1].date;
                if bar.date == prev {
                    return Err(BacktestError::invalid_series(format!(
                        "{symbol}: duplicate date {}",
                        bar.date
                    )));
                }
                if bar.date < prev {
                    return Err(BacktestError::invalid_series(format!(
                        "{symbol}: date {} follows {}",
                        bar.date, prev
                    )));
                }
            }
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Copy a contiguous index range into a new series.
    ///
    /// Fails with `InvalidSeries` if the range is empty or out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Result<Self, BacktestError> {
        let bars = self.bars.get(range.clone()).ok_or_else(|| {
            BacktestError::invalid_series(format!(
                "{}: slice {:?} out of bounds for {} bars",
                self.symbol,
                range,
                self.bars.len()
            ))
        })?;
        Self::new(self.symbol.clone(), bars.to_vec())
    }
}

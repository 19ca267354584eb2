//! Daily OHLC bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Close-to-close return relative to the previous bar's close.
    pub fn close_return(&self, prev_close: f64) -> f64 {
        (self.close - prev_close) / prev_close
    }

    /// Return from the previous close to this bar's open.
    pub fn overnight_return(&self, prev_close: f64) -> f64 {
        (self.open - prev_close) / prev_close
    }

    /// Name of the first OHLC field that is NaN, infinite or non-positive.
    pub(crate) fn invalid_price_field(&self) -> Option<&'static str> {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite() || *v <= 0.0)
        .map(|(name, _)| name)
    }
}

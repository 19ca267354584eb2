//! Price data access port trait.

use crate::domain::bar::Bar;
use crate::domain::error::BacktestError;
use crate::domain::series::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `symbol` within the inclusive date range, ascending by date.
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, BacktestError>;

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktestError>;

    /// Fetch and validate into a `PriceSeries`.
    fn fetch_series(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, BacktestError> {
        let bars = self.fetch_bars(symbol, start_date, end_date)?;
        if bars.is_empty() {
            return Err(BacktestError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("no bars between {start_date} and {end_date}"),
            });
        }
        PriceSeries::new(symbol, bars)
    }
}

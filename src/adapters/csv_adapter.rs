//! CSV file data adapter.
//!
//! Reads `<base_path>/<SYMBOL>.csv` with header `date,open,high,low,close,volume`.
//! Empty price fields are read as NaN so that series validation rejects them
//! as `InvalidSeries` instead of the adapter silently dropping rows.

use crate::domain::bar::Bar;
use crate::domain::error::BacktestError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<Bar>, BacktestError> {
        let path = self.csv_path(symbol);
        let unavailable = |reason: String| BacktestError::DataUnavailable {
            symbol: symbol.to_string(),
            reason,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| unavailable(format!("failed to read {}: {}", path.display(), e)))?;

        let mut bars = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| unavailable(format!("CSV parse error: {}", e)))?;
            let row = line + 2;

            let field = |idx: usize, name: &str| {
                record
                    .get(idx)
                    .ok_or_else(|| unavailable(format!("row {}: missing {} column", row, name)))
            };

            let date = NaiveDate::parse_from_str(field(0, "date")?, "%Y-%m-%d")
                .map_err(|e| unavailable(format!("row {}: invalid date: {}", row, e)))?;

            let price = |idx: usize, name: &str| -> Result<f64, BacktestError> {
                let raw = field(idx, name)?;
                if raw.is_empty() {
                    return Ok(f64::NAN);
                }
                raw.parse()
                    .map_err(|e| unavailable(format!("row {}: invalid {} value: {}", row, name, e)))
            };

            let volume_raw = field(5, "volume")?;
            let volume = match volume_raw.parse::<u64>() {
                Ok(v) => v,
                Err(_) => match volume_raw.parse::<f64>() {
                    Ok(v) if v.is_finite() && v >= 0.0 => v.round() as u64,
                    _ => {
                        return Err(unavailable(format!(
                            "row {}: invalid volume value: {}",
                            row, volume_raw
                        )));
                    }
                },
            };

            bars.push(Bar {
                date,
                open: price(1, "open")?,
                high: price(2, "high")?,
                low: price(3, "low")?,
                close: price(4, "close")?,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, BacktestError> {
        let mut bars = self.read_all(symbol)?;
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktestError> {
        let bars = self.read_all(symbol)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}

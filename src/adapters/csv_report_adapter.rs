//! CSV report writer.
//!
//! - backtest: `date,close,strategy_return,cumulative_return` per bar, plus the
//!   trade ledger (with holding days) in `<stem>_trades.csv` next to it
//! - sweep: `long_window,short_window,cumulative_return,trade_count`
//!
//! Undefined values are written as empty fields.

use std::path::{Path, PathBuf};

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktestError;
use crate::domain::series::PriceSeries;
use crate::domain::sweep::{OptimizationOutcome, SweepResult};
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// `<dir>/<stem><suffix>.csv` for a given output path.
    pub fn sibling_path(output_path: &Path, suffix: &str) -> PathBuf {
        let stem = output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        output_path.with_file_name(format!("{stem}{suffix}.csv"))
    }

    fn writer(path: &Path) -> Result<csv::Writer<std::fs::File>, BacktestError> {
        csv::Writer::from_path(path).map_err(|e| report_error(path, e))
    }
}

fn report_error(path: &Path, e: impl std::fmt::Display) -> BacktestError {
    BacktestError::Report {
        reason: format!("{}: {}", path.display(), e),
    }
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ReportPort for CsvReportAdapter {
    fn write_backtest(
        &self,
        series: &PriceSeries,
        result: &BacktestResult,
        output_path: &Path,
    ) -> Result<(), BacktestError> {
        let mut wtr = Self::writer(output_path)?;
        wtr.write_record(["date", "close", "strategy_return", "cumulative_return"])
            .map_err(|e| report_error(output_path, e))?;

        for (i, bar) in series.bars().iter().enumerate() {
            wtr.write_record([
                bar.date.to_string(),
                bar.close.to_string(),
                opt(result.per_bar_return.get(i)),
                opt(result.cumulative.get(i).copied()),
            ])
            .map_err(|e| report_error(output_path, e))?;
        }
        wtr.flush()?;

        let trades_path = Self::sibling_path(output_path, "_trades");
        let mut wtr = Self::writer(&trades_path)?;
        wtr.write_record([
            "entry_date",
            "entry_price",
            "exit_date",
            "exit_price",
            "return",
            "holding_days",
        ])
        .map_err(|e| report_error(&trades_path, e))?;

        for trade in &result.ledger {
            wtr.write_record([
                trade.entry_date.to_string(),
                trade.entry_price.to_string(),
                trade.exit_date.to_string(),
                trade.exit_price.to_string(),
                trade.trade_return.to_string(),
                trade.holding_days().to_string(),
            ])
            .map_err(|e| report_error(&trades_path, e))?;
        }
        wtr.flush()?;

        Ok(())
    }

    fn write_sweep(&self, results: &[SweepResult], output_path: &Path) -> Result<(), BacktestError> {
        let mut wtr = Self::writer(output_path)?;
        wtr.write_record([
            "long_window",
            "short_window",
            "cumulative_return",
            "trade_count",
        ])
        .map_err(|e| report_error(output_path, e))?;

        for r in results {
            wtr.write_record([
                r.long_window.to_string(),
                r.short_window.to_string(),
                r.cumulative_return.to_string(),
                r.trade_count.to_string(),
            ])
            .map_err(|e| report_error(output_path, e))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Grid to `output_path`, validation run to `<stem>_validation.csv`.
    fn write_optimization(
        &self,
        outcome: &OptimizationOutcome,
        output_path: &Path,
    ) -> Result<(), BacktestError> {
        self.write_sweep(&outcome.grid, output_path)?;
        if let Some(validation) = &outcome.validation {
            let path = Self::sibling_path(output_path, "_validation");
            self.write_backtest(&outcome.test, validation, &path)?;
        }
        Ok(())
    }
}

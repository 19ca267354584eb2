//! Report output port trait.

use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktestError;
use crate::domain::series::PriceSeries;
use crate::domain::sweep::{OptimizationOutcome, SweepResult};

/// Port for writing backtest and sweep results.
pub trait ReportPort {
    fn write_backtest(
        &self,
        series: &PriceSeries,
        result: &BacktestResult,
        output_path: &Path,
    ) -> Result<(), BacktestError>;

    fn write_sweep(&self, results: &[SweepResult], output_path: &Path) -> Result<(), BacktestError>;

    /// Default implementation: writes the sweep grid only.
    fn write_optimization(
        &self,
        outcome: &OptimizationOutcome,
        output_path: &Path,
    ) -> Result<(), BacktestError> {
        self.write_sweep(&outcome.grid, output_path)
    }
}

//! Signal-driven single-position simulator.
//!
//! Walks the series in date order with a `Position` state machine:
//! - entry signal while flat opens a long at that bar's close
//! - exit signal while long closes it, appending a `Trade`
//! - entry while long and exit while flat are no-ops
//!
//! At most one transition happens per bar: a bar carrying both signals opens
//! a position when flat and closes it when long. Crossover signals never
//! coincide, so this only matters for hand-built signal columns.
//!
//! A position still open after the last bar is NOT force-closed. It is
//! excluded from the ledger and from every return figure, and is reported
//! separately as `open_position` so callers can see it.

use tracing::debug;

use crate::domain::indicator::{IndicatorColumn, IndicatorType, SignalColumn};
use crate::domain::position::{Position, Trade};
use crate::domain::series::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub ledger: Vec<Trade>,
    /// Realized trade return at each exit bar, undefined everywhere else.
    pub per_bar_return: IndicatorColumn,
    /// State after the last bar; `Long` means an unrealized position.
    pub open_position: Position,
}

/// Pure function of its inputs: identical inputs always give identical output.
///
/// Signal columns shorter than the series are treated as false past their end.
pub fn simulate(series: &PriceSeries, entry: &SignalColumn, exit: &SignalColumn) -> SimulationResult {
    let bars = series.bars();
    let mut position = Position::Flat;
    let mut ledger = Vec::new();
    let mut per_bar = vec![None; bars.len()];

    for (i, bar) in bars.iter().enumerate() {
        if position.is_flat() {
            if entry.is_set(i) {
                position.enter(bar.date, bar.close);
            }
        } else if exit.is_set(i) {
            if let Some(trade) = position.exit(bar.date, bar.close) {
                per_bar[i] = Some(trade.trade_return);
                ledger.push(trade);
            }
        }
    }

    debug!(
        symbol = series.symbol(),
        entry = %entry.name,
        exit = %exit.name,
        trades = ledger.len(),
        open = position.is_long(),
        "simulation complete"
    );

    SimulationResult {
        ledger,
        per_bar_return: IndicatorColumn {
            indicator_type: IndicatorType::StrategyReturn,
            values: per_bar,
        },
        open_position: position,
    }
}

//! Technical indicator columns and crossover signals.
//!
//! This module provides the index-aligned column types every derived series uses:
//! - `IndicatorType`: indicator identity + parameters, used as the column name
//! - `IndicatorColumn`: optional real values, undefined during warmup
//! - `SignalColumn`: boolean transition flags
//!
//! Columns are always derived fresh from an immutable `PriceSeries` and are
//! owned by the caller; nothing here caches or mutates shared state.

pub mod crossover;
pub mod sma;

pub use crossover::{crossover, crossunder};
pub use sma::moving_average;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    StrategyReturn,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::StrategyReturn => write!(f, "STRATEGY_RETURN"),
        }
    }
}

/// A same-length-as-series sequence of optional values, aligned by index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorColumn {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorColumn {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }
}

/// A same-length-as-series boolean sequence, true where a transition fires.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalColumn {
    pub name: String,
    pub values: Vec<bool>,
}

impl SignalColumn {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.values.get(index).copied().unwrap_or(false)
    }

    /// Build a column from the indices at which it fires.
    pub fn from_indices(name: impl Into<String>, len: usize, indices: &[usize]) -> Self {
        let mut values = vec![false; len];
        for &i in indices {
            if i < len {
                values[i] = true;
            }
        }
        Self {
            name: name.into(),
            values,
        }
    }
}

//! Core domain types and logic.

pub mod bar;
pub mod series;
pub mod indicator;
pub mod position;
pub mod simulator;
pub mod metrics;
pub mod baseline;
pub mod split;
pub mod sweep;
pub mod backtest;
pub mod config_validation;
pub mod error;

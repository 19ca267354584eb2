//! Configuration validation.
//!
//! Validates all config fields before a run and reports the first violation.

use crate::domain::error::BacktestError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    require_non_empty(config, "data", "path")?;
    require_non_empty(config, "data", "symbol")?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    validate_window(config, "short_window")?;
    validate_window(config, "long_window")?;
    validate_window_list(config, "short_windows")?;
    validate_window_list(config, "long_windows")?;
    validate_train_fraction(config)?;
    validate_risk_free_rate(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> BacktestError {
    BacktestError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn require_non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, BacktestError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(BacktestError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

pub fn parse_date(config: &dyn ConfigPort, field: &str) -> Result<NaiveDate, BacktestError> {
    let value = require_non_empty(config, "data", field)?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map_err(|_| invalid("data", field, format!("invalid {} format, expected YYYY-MM-DD", field)))
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let start_date = parse_date(config, "start_date")?;
    let end_date = parse_date(config, "end_date")?;

    if start_date >= end_date {
        return Err(invalid("data", "start_date", "start_date must be before end_date"));
    }
    Ok(())
}

fn validate_window(config: &dyn ConfigPort, key: &str) -> Result<(), BacktestError> {
    let Some(raw) = config.get_string("strategy", key) else {
        return Ok(());
    };
    match raw.trim().parse::<usize>() {
        Ok(w) if w >= 1 => Ok(()),
        _ => Err(invalid("strategy", key, format!("{key} must be a positive integer"))),
    }
}

fn validate_window_list(config: &dyn ConfigPort, key: &str) -> Result<(), BacktestError> {
    match config.get_usize_list("strategy", key) {
        None => Ok(()),
        Some(Err(token)) => Err(invalid(
            "strategy",
            key,
            format!("'{token}' is not a window length"),
        )),
        Some(Ok(windows)) if windows.is_empty() => {
            Err(invalid("strategy", key, format!("{key} must list at least one window")))
        }
        Some(Ok(windows)) if windows.contains(&0) => {
            Err(invalid("strategy", key, "windows must be at least 1"))
        }
        Some(Ok(_)) => Ok(()),
    }
}

fn validate_train_fraction(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let Some(raw) = config.get_string("strategy", "train_fraction") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(f) if f > 0.0 && f < 1.0 => Ok(()),
        _ => Err(invalid(
            "strategy",
            "train_fraction",
            "train_fraction must be strictly between 0 and 1",
        )),
    }
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let Some(raw) = config.get_string("strategy", "risk_free_rate") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(r) if (0.0..1.0).contains(&r) => Ok(()),
        _ => Err(invalid(
            "strategy",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        )),
    }
}

//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestResult, StrategyConfig};
use crate::domain::baseline::BaselineReport;
use crate::domain::config_validation::{parse_date, validate_data_config, validate_strategy_config};
use crate::domain::error::BacktestError;
use crate::domain::metrics::{Metric, MetricsReport};
use crate::domain::position::Position;
use crate::domain::series::PriceSeries;
use crate::domain::sweep::{self, OptimizationOutcome};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "smacross", about = "Moving-average crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one crossover backtest over the configured date range
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long = "short")]
        short_window: Option<usize>,
        #[arg(long = "long")]
        long_window: Option<usize>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Grid-search window pairs on the training split, validate on the test split
    Sweep {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range for the configured symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

/// Where and what to load.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRequest {
    pub path: PathBuf,
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Install the stderr `tracing` subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            short_window,
            long_window,
            output,
        } => run_backtest(&config, short_window, long_window, output.as_deref()),
        Command::Sweep { config, output } => run_sweep(&config, output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, BacktestError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

pub fn build_data_request(adapter: &dyn ConfigPort) -> Result<DataRequest, BacktestError> {
    let required = |key: &str| {
        adapter
            .get_string("data", key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BacktestError::ConfigMissing {
                section: "data".into(),
                key: key.into(),
            })
    };

    Ok(DataRequest {
        path: PathBuf::from(required("path")?),
        symbol: required("symbol")?.to_uppercase(),
        start_date: parse_date(adapter, "start_date")?,
        end_date: parse_date(adapter, "end_date")?,
    })
}

pub fn build_strategy_config(adapter: &dyn ConfigPort) -> Result<StrategyConfig, BacktestError> {
    let defaults = StrategyConfig::default();

    let window = |key: &str, default: usize| {
        let value = adapter.get_int("strategy", key, default as i64);
        usize::try_from(value)
            .ok()
            .filter(|&w| w >= 1)
            .ok_or_else(|| BacktestError::ConfigInvalid {
                section: "strategy".into(),
                key: key.into(),
                reason: format!("{key} must be a positive integer"),
            })
    };

    let windows = |key: &str, default: &[usize]| match adapter.get_usize_list("strategy", key) {
        None => Ok(default.to_vec()),
        Some(Ok(list)) => Ok(list),
        Some(Err(token)) => Err(BacktestError::ConfigInvalid {
            section: "strategy".into(),
            key: key.into(),
            reason: format!("'{token}' is not a window length"),
        }),
    };

    Ok(StrategyConfig {
        short_window: window("short_window", defaults.short_window)?,
        long_window: window("long_window", defaults.long_window)?,
        short_windows: windows("short_windows", &defaults.short_windows)?,
        long_windows: windows("long_windows", &defaults.long_windows)?,
        train_fraction: adapter.get_double("strategy", "train_fraction", defaults.train_fraction),
        risk_free_rate: adapter.get_double("strategy", "risk_free_rate", defaults.risk_free_rate),
    })
}

/// CLI flag wins over `[report] output`; `None` means console only.
pub fn resolve_output(flag: Option<&Path>, config: &dyn ConfigPort) -> Option<PathBuf> {
    flag.map(Path::to_path_buf).or_else(|| {
        config
            .get_string("report", "output")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    })
}

fn load_validated(config_path: &Path) -> Result<(FileConfigAdapter, DataRequest, StrategyConfig), BacktestError> {
    let adapter = load_config(config_path)?;
    validate_data_config(&adapter)?;
    validate_strategy_config(&adapter)?;
    let request = build_data_request(&adapter)?;
    let strategy = build_strategy_config(&adapter)?;
    Ok((adapter, request, strategy))
}

fn run_backtest(
    config_path: &Path,
    short_override: Option<usize>,
    long_override: Option<usize>,
    output_flag: Option<&Path>,
) -> Result<(), BacktestError> {
    let (adapter, request, mut strategy) = load_validated(config_path)?;

    if let Some(w) = short_override {
        strategy.short_window = w;
    }
    if let Some(w) = long_override {
        strategy.long_window = w;
    }
    for (name, w) in [("short", strategy.short_window), ("long", strategy.long_window)] {
        if w == 0 {
            return Err(BacktestError::InvalidWindow {
                reason: format!("{name} window must be at least 1"),
            });
        }
    }

    let data_port = CsvAdapter::new(request.path.clone());
    let output = resolve_output(output_flag, &adapter);
    run_backtest_pipeline(
        &data_port,
        &CsvReportAdapter::new(),
        &request,
        &strategy,
        output.as_deref(),
    )?;
    Ok(())
}

/// Fetch, run one backtest, print the console summary and optionally write the report.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    request: &DataRequest,
    strategy: &StrategyConfig,
    output_path: Option<&Path>,
) -> Result<BacktestResult, BacktestError> {
    let series = data_port.fetch_series(&request.symbol, request.start_date, request.end_date)?;
    info!(symbol = %request.symbol, bars = series.len(), "loaded price series");

    let baseline = BaselineReport::compute(&series, strategy.risk_free_rate);
    let result = backtest_engine::run_backtest(&series, strategy);

    if let (Some(first), Some(last)) = (series.first_date(), series.last_date()) {
        eprintln!(
            "\n{} {} to {} ({} bars)",
            request.symbol,
            first,
            last,
            series.len()
        );
    }
    print_report("Buy and Hold", &baseline.buy_and_hold);
    print_report("Overnight", &baseline.overnight);
    print_strategy(
        &format!(
            "SMA({}) / SMA({}) Crossover",
            strategy.short_window, strategy.long_window
        ),
        &result,
        &series,
    );

    if let Some(path) = output_path {
        report_port.write_backtest(&series, &result, path)?;
        eprintln!("\nReport written to: {}", path.display());
    }

    Ok(result)
}

fn run_sweep(config_path: &Path, output_flag: Option<&Path>) -> Result<(), BacktestError> {
    let (adapter, request, strategy) = load_validated(config_path)?;
    let data_port = CsvAdapter::new(request.path.clone());
    let output = resolve_output(output_flag, &adapter);
    run_sweep_pipeline(
        &data_port,
        &CsvReportAdapter::new(),
        &request,
        &strategy,
        output.as_deref(),
    )?;
    Ok(())
}

/// Fetch, split, sweep the training part, validate the winner on the test part.
pub fn run_sweep_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    request: &DataRequest,
    strategy: &StrategyConfig,
    output_path: Option<&Path>,
) -> Result<OptimizationOutcome, BacktestError> {
    let series = data_port.fetch_series(&request.symbol, request.start_date, request.end_date)?;
    let outcome = sweep::optimize(&series, strategy)?;

    eprintln!(
        "\nTraining on {} bars, validating on {} bars",
        outcome.train.len(),
        outcome.test.len()
    );

    println!("long_window,short_window,cumulative_return,trade_count");
    for r in &outcome.grid {
        println!(
            "{},{},{:.6},{}",
            r.long_window, r.short_window, r.cumulative_return, r.trade_count
        );
    }

    match (&outcome.best, &outcome.validation) {
        (Some(best), Some(validation)) => {
            eprintln!(
                "\nBest on training split: SMA({}) / SMA({}) with {:.2}% over {} trades",
                best.short_window,
                best.long_window,
                best.cumulative_return * 100.0,
                best.trade_count
            );
            let baseline = BaselineReport::compute(&outcome.test, strategy.risk_free_rate);
            print_report("Test Split Buy and Hold", &baseline.buy_and_hold);
            print_strategy("Test Split Crossover", validation, &outcome.test);
        }
        _ => eprintln!("\nEmpty parameter grid: nothing to validate"),
    }

    if let Some(path) = output_path {
        report_port.write_optimization(&outcome, path)?;
        eprintln!("\nSweep written to: {}", path.display());
    }

    Ok(outcome)
}

fn run_validate(config_path: &Path) -> Result<(), BacktestError> {
    let (_, request, strategy) = load_validated(config_path)?;

    eprintln!("\nData:");
    eprintln!("  path:   {}", request.path.display());
    eprintln!("  symbol: {}", request.symbol);
    eprintln!("  range:  {} to {}", request.start_date, request.end_date);

    eprintln!("\nStrategy:");
    eprintln!(
        "  backtest: SMA({}) / SMA({})",
        strategy.short_window, strategy.long_window
    );
    eprintln!("  short_windows:  {:?}", strategy.short_windows);
    eprintln!("  long_windows:   {:?}", strategy.long_windows);
    eprintln!("  train_fraction: {}", strategy.train_fraction);
    eprintln!("  risk_free_rate: {}", strategy.risk_free_rate);

    eprintln!("\nConfiguration is valid.");
    Ok(())
}

fn run_info(config_path: &Path, symbol_override: Option<&str>) -> Result<(), BacktestError> {
    let adapter = load_config(config_path)?;

    let path = adapter
        .get_string("data", "path")
        .ok_or_else(|| BacktestError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    let symbol = match symbol_override {
        Some(s) => s.to_uppercase(),
        None => adapter
            .get_string("data", "symbol")
            .map(|s| s.trim().to_uppercase())
            .ok_or_else(|| BacktestError::ConfigMissing {
                section: "data".into(),
                key: "symbol".into(),
            })?,
    };

    let data_port = CsvAdapter::new(PathBuf::from(path.trim()));
    match data_port.get_data_range(&symbol)? {
        Some((min_date, max_date, count)) => {
            println!("{}: {} bars, {} to {}", symbol, count, min_date, max_date);
        }
        None => eprintln!("{}: no data found", symbol),
    }
    Ok(())
}

fn pct(metric: Metric) -> String {
    match metric {
        Metric::Computed(v) => format!("{:.2}%", v * 100.0),
        Metric::Undefined => "n/a".to_string(),
    }
}

fn print_report(label: &str, report: &MetricsReport) {
    eprintln!("\n=== {} ===", label);
    eprintln!("Cumulative Return:  {:.2}%", report.cumulative_return * 100.0);
    eprintln!("Annualized Return:  {}", pct(report.annualized_return));
    eprintln!("Annualized Vol:     {}", pct(report.annualized_volatility));
    eprintln!("Sharpe Ratio:       {:.2}", report.sharpe_ratio);

    if report.trade_count > 0 {
        eprintln!("Total Trades:       {}", report.trade_count);
        eprintln!(
            "Wins / Losses:      {} / {} ({} breakeven)",
            report.win_count,
            report.loss_count,
            report.breakeven_count()
        );
        eprintln!("Win Rate:           {}", pct(report.win_rate()));
    }
}

fn print_strategy(label: &str, result: &BacktestResult, series: &PriceSeries) {
    print_report(label, &result.report);
    if result.ledger.is_empty() {
        eprintln!("No completed trades");
    }
    if let Position::Long {
        entry_price,
        entry_date,
    } = result.open_position
    {
        let unrealized = series
            .bars()
            .last()
            .and_then(|bar| result.open_position.unrealized_return(bar.close));
        eprintln!(
            "Open position:      long since {} at {:.2}, unrealized {} (excluded)",
            entry_date,
            entry_price,
            pct(unrealized.into())
        );
    }
}

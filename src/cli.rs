//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::alert_adapter::{format_alert, format_price, ConsoleAlertSink, RecentAlerts};
use crate::adapters::csv_adapter::CsvCandleSource;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::candle::Candle;
use crate::domain::config_validation::validate_config;
use crate::domain::error::CandlewatchError;
use crate::domain::indicator::pattern::detect_patterns_in;
use crate::domain::indicator::{calculate_fibonacci_levels, IndicatorType};
use crate::domain::indicator_set::{compute_indicators, enabled_indicator_types, IndicatorSet};
use crate::domain::replay::{replay, ReplaySummary};
use crate::domain::rule::RuleDefinition;
use crate::domain::settings::{load_settings, Settings};
use crate::domain::signal_engine::MIN_CANDLES;
use crate::domain::watchlist::Watchlist;
use crate::ports::alert_sink::AlertSink;
use crate::ports::candle_source::CandleSource;

#[derive(Parser, Debug)]
#[command(name = "candlewatch", about = "Indicator and trading-signal scanner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay candle files through the signal state machine
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        symbol: Option<String>,
        #[arg(short, long)]
        window: Option<usize>,
    },
    /// Print the latest indicator values for a symbol
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        symbol: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Scan {
            config,
            data,
            symbol,
            window,
        } => run_scan(&config, &data, symbol.as_deref(), window),
        Command::Indicators {
            config,
            data,
            symbol,
        } => run_indicators(&config, &data, symbol.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, CandlewatchError> {
    FileConfigAdapter::from_file(path).map_err(|e| CandlewatchError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn load_candles(
    source: &dyn CandleSource,
    symbol: &str,
) -> Result<Vec<Candle>, CandlewatchError> {
    let candles = source.fetch_candles(symbol)?;
    if candles.is_empty() {
        return Err(CandlewatchError::NoData {
            symbol: symbol.to_string(),
        });
    }
    if candles.len() < MIN_CANDLES {
        return Err(CandlewatchError::InsufficientData {
            symbol: symbol.to_string(),
            candles: candles.len(),
            minimum: MIN_CANDLES,
        });
    }
    Ok(candles)
}

/// `--symbol`, then `[general] symbol`, then every file in the data directory.
fn resolve_symbols(
    source: &dyn CandleSource,
    settings: &Settings,
    symbol: Option<&str>,
) -> Result<Vec<String>, CandlewatchError> {
    if let Some(s) = symbol.or(settings.general.symbol.as_deref()) {
        return Ok(vec![s.to_string()]);
    }
    let symbols = source.list_symbols()?;
    if symbols.is_empty() {
        return Err(CandlewatchError::NoData {
            symbol: "*".to_string(),
        });
    }
    Ok(symbols)
}

fn run_scan(
    config_path: &Path,
    data_dir: &Path,
    symbol: Option<&str>,
    window: Option<usize>,
) -> Result<(), CandlewatchError> {
    info!(config = %config_path.display(), "loading config");
    let adapter = load_config(config_path)?;
    let settings = load_settings(&adapter)?;
    let window = window.unwrap_or(settings.general.window);
    let indicators = settings.effective_indicators();

    let source = CsvCandleSource::new(data_dir.to_path_buf());
    let symbols = resolve_symbols(&source, &settings, symbol)?;

    let mut watchlist = Watchlist::new(settings.strategy.clone());
    let mut console = ConsoleAlertSink::stdout(settings.notifications);
    let mut recent = RecentAlerts::default();
    let mut summaries = Vec::with_capacity(symbols.len());

    for symbol in &symbols {
        let candles = match load_candles(&source, symbol) {
            Ok(c) => c,
            Err(e) if symbols.len() > 1 => {
                warn!(symbol = %symbol, error = %e, "skipping symbol");
                continue;
            }
            Err(e) => return Err(e),
        };
        info!(symbol = %symbol, candles = candles.len(), window, "replaying");

        let summary = replay(&mut watchlist, symbol, &candles, &indicators, window, |signal| {
            console.send(symbol, signal);
            recent.send(symbol, signal);
        });
        summaries.push(summary);
    }

    println!();
    for summary in &summaries {
        print_summary(summary);
    }
    if !recent.is_empty() {
        println!("\nRecent alerts:");
        for alert in recent.iter() {
            println!(
                "  {}  {}",
                alert.time.format("%Y-%m-%d %H:%M"),
                format_alert(&alert.symbol, &alert.signal)
            );
        }
    }
    Ok(())
}

fn print_summary(summary: &ReplaySummary) {
    let stats = summary.stats();
    println!("=== {} ===", summary.symbol);
    println!("Periods evaluated: {}", summary.periods);
    println!("Signals:           {}", summary.signals.len());
    println!(
        "Closed trades:     {} ({} won, {} lost, {} even)",
        stats.total_trades, stats.trades_won, stats.trades_lost, stats.trades_breakeven
    );
    println!("Win rate:          {:.1}%", stats.win_rate * 100.0);
    println!("Total profit:      {:+.2}", stats.total_profit);
    println!("Total return:      {:+.2}%", stats.total_profit_percent);
    println!("Average return:    {:+.2}%", stats.avg_profit_percent);
    if let Some(entry) = summary.open_entry {
        println!("Open position:     long @ {}", format_price(entry));
    }
}

fn run_indicators(
    config_path: &Path,
    data_dir: &Path,
    symbol: Option<&str>,
) -> Result<(), CandlewatchError> {
    let adapter = load_config(config_path)?;
    let settings = load_settings(&adapter)?;
    let source = CsvCandleSource::new(data_dir.to_path_buf());

    let symbols = resolve_symbols(&source, &settings, symbol)?;
    for symbol in &symbols {
        let candles = load_candles(&source, symbol)?;
        let window = trailing_window(&candles, settings.general.window);
        let indicators = settings.effective_indicators();
        let set = compute_indicators(window, &indicators);
        let mut ma_rows = [set.fast_ma.as_slice(), set.slow_ma.as_slice()].into_iter();

        println!("=== {} ===", symbol);
        if let Some(last) = window.last() {
            println!(
                "Last candle:  {}  O {}  H {}  L {}  C {}",
                last.timestamp.format("%Y-%m-%d %H:%M"),
                format_price(last.open),
                format_price(last.high),
                format_price(last.low),
                format_price(last.close)
            );
        }
        for indicator in enabled_indicator_types(&indicators) {
            let mut values = latest_values(&indicator, &set, &mut ma_rows);
            if window.len() < indicator.warmup() {
                values = format!("n/a (needs {} candles)", indicator.warmup());
            }
            println!("{:<22} {}", indicator.to_string(), values);
        }

        let high = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let fib = calculate_fibonacci_levels(high, low);
        println!("Fibonacci ({} candles):", window.len());
        for (ratio, price) in fib.levels() {
            println!("  {:>5.1}%  {}", ratio * 100.0, format_price(price));
        }

        let patterns = detect_patterns_in(window);
        if patterns.is_empty() {
            println!("Patterns: none");
        } else {
            for pattern in patterns {
                println!(
                    "Pattern: {} ({}) - {}",
                    pattern,
                    pattern.bias(),
                    pattern.description()
                );
            }
        }
        println!();
    }
    Ok(())
}

fn latest(series: &[f64]) -> String {
    match series.last() {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => "n/a".to_string(),
    }
}

/// The trailing `window` candles, never fewer than the state machine needs.
fn trailing_window(candles: &[Candle], window: usize) -> &[Candle] {
    let start = candles.len().saturating_sub(window.max(MIN_CANDLES));
    &candles[start..]
}

/// Moving-average rows arrive fast then slow; `ma_rows` yields their series
/// in that order.
fn latest_values<'a>(
    indicator: &IndicatorType,
    set: &IndicatorSet,
    ma_rows: &mut impl Iterator<Item = &'a [f64]>,
) -> String {
    match indicator {
        IndicatorType::Rsi(_) => latest(&set.rsi),
        IndicatorType::Sma(_) | IndicatorType::Ema(_) => {
            ma_rows.next().map(latest).unwrap_or_else(|| "n/a".to_string())
        }
        IndicatorType::Bollinger { .. } => format!(
            "upper {}  middle {}  lower {}",
            latest(&set.bollinger.upper),
            latest(&set.bollinger.middle),
            latest(&set.bollinger.lower)
        ),
        IndicatorType::Macd { .. } => format!(
            "macd {}  signal {}  histogram {}",
            latest(&set.macd.macd),
            latest(&set.macd.signal),
            latest(&set.macd.histogram)
        ),
        IndicatorType::Stochastic { .. } => format!(
            "%K {}  %D {}",
            latest(&set.stochastic.k),
            latest(&set.stochastic.d)
        ),
        IndicatorType::Atr(_) => latest(&set.atr),
    }
}

fn run_validate(config_path: &Path) -> Result<(), CandlewatchError> {
    let adapter = load_config(config_path)?;
    let settings = validate_config(&adapter)?;

    let enabled = |rules: &[RuleDefinition]| {
        rules
            .iter()
            .filter(|r| r.enabled)
            .map(|r| r.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("Configuration is valid.");
    println!("  Entry rules: {}", enabled(&settings.strategy.entry_rules));
    println!("  Exit rules:  {}", enabled(&settings.strategy.exit_rules));
    println!(
        "  Indicators:  {}",
        enabled_indicator_types(&settings.effective_indicators())
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

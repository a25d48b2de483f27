#![allow(dead_code)]

use candlewatch::adapters::file_config_adapter::FileConfigAdapter;
pub use candlewatch::domain::candle::Candle;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
}

pub fn make_candle(day: i64, open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle {
        timestamp: start_time() + Duration::days(day),
        open,
        high,
        low,
        close,
        volume: 1000.0,
    }
}

/// Flat candles: open, high and low all equal the close.
pub fn flat_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_candle(i as i64, c, c, c, c))
        .collect()
}

/// Candles with a fixed spread around each close.
pub fn candles_with_spread(closes: &[f64], spread: f64) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_candle(i as i64, c, c + spread, c - spread, c))
        .collect()
}

pub fn config_from(content: &str) -> FileConfigAdapter {
    FileConfigAdapter::from_string(content).unwrap()
}

pub fn write_temp_ini(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn write_csv(dir: &Path, symbol: &str, candles: &[Candle]) {
    let mut content = String::from("timestamp,open,high,low,close,volume\n");
    for c in candles {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            c.timestamp.to_rfc3339(),
            c.open,
            c.high,
            c.low,
            c.close,
            c.volume
        ));
    }
    fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}

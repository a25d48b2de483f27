//! CSV file candle source.
//!
//! One file per symbol, `<dir>/<SYMBOL>.csv`, with header
//! `timestamp,open,high,low,close,volume`. Timestamps may be RFC 3339,
//! Unix seconds, or a plain `YYYY-MM-DD` date (midnight UTC).

use crate::domain::candle::Candle;
use crate::domain::error::CandlewatchError;
use crate::ports::candle_source::CandleSource;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct CsvCandleSource {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CandleRow {
    timestamp: String,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
}

impl CsvCandleSource {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(secs) = value.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl CandleSource for CsvCandleSource {
    fn fetch_candles(&self, symbol: &str) -> Result<Vec<Candle>, CandlewatchError> {
        let path = self.csv_path(symbol);
        let source_name = path.display().to_string();
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CandlewatchError::NoData {
                    symbol: symbol.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut candles = Vec::new();

        for (line, result) in rdr.deserialize::<CandleRow>().enumerate() {
            let row = result.map_err(|e| CandlewatchError::Data {
                source_name: source_name.clone(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let timestamp =
                parse_timestamp(&row.timestamp).ok_or_else(|| CandlewatchError::Data {
                    source_name: source_name.clone(),
                    reason: format!("invalid timestamp '{}'", row.timestamp),
                })?;

            let (Some(open), Some(high), Some(low), Some(close)) =
                (row.open, row.high, row.low, row.close)
            else {
                warn!(symbol, row = line + 1, "skipping row with missing price");
                continue;
            };

            candles.push(Candle {
                timestamp,
                open,
                high,
                low,
                close,
                volume: row.volume.unwrap_or(0.0),
            });
        }

        candles.sort_by_key(|c| c.timestamp);
        debug!(symbol, count = candles.len(), "loaded candles");
        Ok(candles)
    }

    fn list_symbols(&self) -> Result<Vec<String>, CandlewatchError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut symbols = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem() {
                    symbols.push(stem.to_string_lossy().into_owned());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

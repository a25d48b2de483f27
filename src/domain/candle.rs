//! Candle (OHLCV bar) representation.

use chrono::{DateTime, Utc};

/// One completed market period. Series of candles are ordered ascending by
/// `timestamp` with no duplicates; this is a caller precondition.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Column views over a candle series, in the same order.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

pub fn opens(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.open).collect()
}

pub fn highs(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.high).collect()
}

pub fn lows(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.low).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_candle() -> Candle {
        Candle {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn column_views_preserve_order() {
        let mut second = sample_candle();
        second.close = 107.0;
        second.open = 104.0;
        let candles = vec![sample_candle(), second];

        assert_eq!(closes(&candles), vec![105.0, 107.0]);
        assert_eq!(opens(&candles), vec![100.0, 104.0]);
        assert_eq!(highs(&candles), vec![110.0, 110.0]);
        assert_eq!(lows(&candles), vec![90.0, 90.0]);
    }
}

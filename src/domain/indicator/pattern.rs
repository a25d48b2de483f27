//! Candlestick pattern detection on the latest candle.
//!
//! Single-candle shapes (Doji, Hammer, Shooting Star) look at the last candle;
//! engulfing patterns compare it with the one before. Several patterns may
//! match the same candle.

use crate::domain::candle::{closes, highs, lows, opens, Candle};
use std::fmt;

/// Fewer candles than this yields no patterns.
pub const MIN_PATTERN_CANDLES: usize = 3;

const DOJI_BODY_RATIO: f64 = 0.05;
const HAMMER_BODY_RATIO: f64 = 0.3;
const SHORT_SHADOW_RATIO: f64 = 0.5;
const LONG_SHADOW_RATIO: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandlePattern {
    Doji,
    Hammer,
    ShootingStar,
    BullishEngulfing,
    BearishEngulfing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternBias {
    Neutral,
    Bullish,
    Bearish,
}

impl CandlePattern {
    pub fn name(&self) -> &'static str {
        match self {
            CandlePattern::Doji => "Doji",
            CandlePattern::Hammer => "Hammer",
            CandlePattern::ShootingStar => "Shooting Star",
            CandlePattern::BullishEngulfing => "Bullish Engulfing",
            CandlePattern::BearishEngulfing => "Bearish Engulfing",
        }
    }

    pub fn bias(&self) -> PatternBias {
        match self {
            CandlePattern::Doji => PatternBias::Neutral,
            CandlePattern::Hammer | CandlePattern::BullishEngulfing => PatternBias::Bullish,
            CandlePattern::ShootingStar | CandlePattern::BearishEngulfing => PatternBias::Bearish,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CandlePattern::Doji => "Market indecision",
            CandlePattern::Hammer => "Possible reversal from downtrend to uptrend",
            CandlePattern::ShootingStar => "Possible reversal from uptrend to downtrend",
            CandlePattern::BullishEngulfing => "Strong reversal signal from down to up",
            CandlePattern::BearishEngulfing => "Strong reversal signal from up to down",
        }
    }
}

impl fmt::Display for CandlePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for PatternBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternBias::Neutral => f.write_str("neutral"),
            PatternBias::Bullish => f.write_str("bullish"),
            PatternBias::Bearish => f.write_str("bearish"),
        }
    }
}

/// Detect patterns on the last element of four right-aligned OHLC columns.
pub fn detect_candle_patterns(
    open: &[f64],
    high: &[f64],
    low: &[f64],
    close: &[f64],
) -> Vec<CandlePattern> {
    let len = open.len().min(high.len()).min(low.len()).min(close.len());
    if len < MIN_PATTERN_CANDLES {
        return Vec::new();
    }

    let last = |s: &[f64], back: usize| s[s.len() - 1 - back];
    let (o, h, l, c) = (last(open, 0), last(high, 0), last(low, 0), last(close, 0));
    let (prev_o, prev_c) = (last(open, 1), last(close, 1));

    let mut patterns = Vec::new();
    if is_doji(o, h, l, c) {
        patterns.push(CandlePattern::Doji);
    }
    if is_hammer(o, h, l, c) {
        patterns.push(CandlePattern::Hammer);
    }
    if is_shooting_star(o, h, l, c) {
        patterns.push(CandlePattern::ShootingStar);
    }
    if is_bullish_engulfing(prev_o, prev_c, o, c) {
        patterns.push(CandlePattern::BullishEngulfing);
    }
    if is_bearish_engulfing(prev_o, prev_c, o, c) {
        patterns.push(CandlePattern::BearishEngulfing);
    }
    patterns
}

pub fn detect_patterns_in(candles: &[Candle]) -> Vec<CandlePattern> {
    detect_candle_patterns(
        &opens(candles),
        &highs(candles),
        &lows(candles),
        &closes(candles),
    )
}

struct Shape {
    body: f64,
    range: f64,
    upper_shadow: f64,
    lower_shadow: f64,
}

fn shape(open: f64, high: f64, low: f64, close: f64) -> Shape {
    Shape {
        body: (open - close).abs(),
        range: high - low,
        upper_shadow: high - open.max(close),
        lower_shadow: open.min(close) - low,
    }
}

pub fn is_doji(open: f64, high: f64, low: f64, close: f64) -> bool {
    let s = shape(open, high, low, close);
    s.body <= s.range * DOJI_BODY_RATIO
}

pub fn is_hammer(open: f64, high: f64, low: f64, close: f64) -> bool {
    let s = shape(open, high, low, close);
    s.body <= s.range * HAMMER_BODY_RATIO
        && s.upper_shadow <= s.body * SHORT_SHADOW_RATIO
        && s.lower_shadow >= s.body * LONG_SHADOW_RATIO
}

pub fn is_shooting_star(open: f64, high: f64, low: f64, close: f64) -> bool {
    let s = shape(open, high, low, close);
    s.body <= s.range * HAMMER_BODY_RATIO
        && s.upper_shadow >= s.body * LONG_SHADOW_RATIO
        && s.lower_shadow <= s.body * SHORT_SHADOW_RATIO
}

/// Prior candle bearish, current bullish, current body covers the prior one.
pub fn is_bullish_engulfing(prev_open: f64, prev_close: f64, open: f64, close: f64) -> bool {
    prev_close < prev_open && close > open && open < prev_close && close > prev_open
}

/// Prior candle bullish, current bearish, current body covers the prior one.
pub fn is_bearish_engulfing(prev_open: f64, prev_close: f64, open: f64, close: f64) -> bool {
    prev_close > prev_open && close < open && open > prev_close && close < prev_open
}

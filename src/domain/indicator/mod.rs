//! Technical indicator implementations.
//!
//! Every indicator is a pure function from an input series to a newly
//! allocated output series. Outputs are aligned to the input by *trailing
//! offset*: an output of length `L` computed from `N` inputs starts at input
//! index `N - L`. Inputs shorter than the warm-up yield empty outputs.
//!
//! - `IndicatorType`: indicator identity + parameters
//! - `BollingerBands`, `Macd`, `Stochastic`: multi-line outputs

pub mod align;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod fibonacci;
pub mod macd;
pub mod pattern;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use atr::calculate_atr;
pub use bollinger::calculate_bollinger;
pub use ema::calculate_ema;
pub use fibonacci::{calculate_fibonacci_levels, FibonacciLevels};
pub use macd::calculate_macd;
pub use pattern::{detect_candle_patterns, CandlePattern, PatternBias};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stochastic::calculate_stochastic;

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BollingerBands {
    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Macd {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl Macd {
    pub fn is_empty(&self) -> bool {
        self.signal.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stochastic {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

impl Stochastic {
    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Stochastic {
        period: usize,
        smooth_k: usize,
        smooth_d: usize,
    },
    Bollinger {
        period: usize,
        deviation_x100: u32,
    },
}

impl IndicatorType {
    /// Minimum input length that produces at least one output value.
    pub fn warmup(&self) -> usize {
        match *self {
            IndicatorType::Sma(period) | IndicatorType::Ema(period) => period,
            IndicatorType::Rsi(period) | IndicatorType::Atr(period) => period + 1,
            IndicatorType::Bollinger { period, .. } => period,
            IndicatorType::Macd { slow, signal, .. } => slow + signal,
            IndicatorType::Stochastic {
                period,
                smooth_k,
                smooth_d,
            } => period + smooth_k + smooth_d - 2,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Stochastic {
                period,
                smooth_k,
                smooth_d,
            } => write!(f, "STOCHASTIC({},{},{})", period, smooth_k, smooth_d),
            IndicatorType::Bollinger {
                period,
                deviation_x100,
            } => {
                let mult = *deviation_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}

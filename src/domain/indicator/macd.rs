//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow), right-aligned
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line, right-aligned
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Requires at least slow + signal prices, otherwise all three lines are empty.

use crate::domain::indicator::align::zip_aligned;
use crate::domain::indicator::{calculate_ema, Macd};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(prices: &[f64], fast: usize, slow: usize, signal_period: usize) -> Macd {
    if fast == 0 || slow == 0 || signal_period == 0 || prices.len() < slow + signal_period {
        return Macd::default();
    }

    let ema_fast = calculate_ema(prices, fast);
    let ema_slow = calculate_ema(prices, slow);

    let macd = zip_aligned(&ema_fast, &ema_slow, |f, s| f - s);
    let signal = calculate_ema(&macd, signal_period);
    let histogram = zip_aligned(&macd, &signal, |m, s| m - s);

    Macd {
        macd,
        signal,
        histogram,
    }
}

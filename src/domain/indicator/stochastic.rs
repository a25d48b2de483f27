//! Stochastic oscillator.
//!
//! raw %K = (C - LL(n)) / (HH(n) - LL(n)) * 100
//! %K = SMA(raw %K, smooth_k), %D = SMA(%K, smooth_d)
//!
//! A flat window (HH == LL) divides by zero and yields a non-finite value;
//! consumers treat it as indeterminate.

use crate::domain::indicator::{calculate_sma, Stochastic};

pub const DEFAULT_PERIOD: usize = 14;
pub const DEFAULT_SMOOTH_K: usize = 3;
pub const DEFAULT_SMOOTH_D: usize = 3;

pub fn calculate_stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
    smooth_k: usize,
    smooth_d: usize,
) -> Stochastic {
    let len = close.len().min(high.len()).min(low.len());
    if period == 0 || len < period {
        return Stochastic::default();
    }

    // Right-align the three columns on their latest values.
    let high = &high[high.len() - len..];
    let low = &low[low.len() - len..];
    let close = &close[close.len() - len..];

    let raw_k: Vec<f64> = (period - 1..len)
        .map(|i| {
            let window = i + 1 - period..=i;
            let highest = high[window.clone()]
                .iter()
                .fold(f64::NEG_INFINITY, |a, &b| a.max(b));
            let lowest = low[window].iter().fold(f64::INFINITY, |a, &b| a.min(b));
            (close[i] - lowest) / (highest - lowest) * 100.0
        })
        .collect();

    let k = calculate_sma(&raw_k, smooth_k);
    let d = calculate_sma(&k, smooth_d);

    Stochastic { k, d }
}

//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(P[i-n+1..=i]), slid one step at a time.
//! Output length: len - n + 1 (empty when len < n).

pub fn calculate_sma(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period {
        return Vec::new();
    }

    prices
        .windows(period)
        .map(|window| window.iter().sum::<f64>() / period as f64)
        .collect()
}

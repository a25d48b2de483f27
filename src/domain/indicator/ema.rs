//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the SMA of the first n prices, then
//! EMA[i] = (P[i] - EMA[i-1]) * k + EMA[i-1].
//! Output length: len - n + 1 (empty when len < n).

pub fn calculate_ema(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut values = Vec::with_capacity(prices.len() - period + 1);

    let mut ema = prices[..period].iter().sum::<f64>() / period as f64;
    values.push(ema);

    for &price in &prices[period..] {
        ema = (price - ema) * k + ema;
        values.push(ema);
    }

    values
}

//! Average True Range.
//!
//! TR[i] = max(H[i] - L[i], |H[i] - C[i-1]|, |L[i] - C[i-1]|) for i >= 1.
//! Seed: mean of the first n true ranges; then ATR = (ATR * (n-1) + TR) / n.
//! Output length: len - n (empty when len < n + 1).

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    let len = close.len().min(high.len()).min(low.len());
    if period == 0 || len < period + 1 {
        return Vec::new();
    }

    let high = &high[high.len() - len..];
    let low = &low[low.len() - len..];
    let close = &close[close.len() - len..];

    let true_ranges: Vec<f64> = (1..len)
        .map(|i| {
            let prev_close = close[i - 1];
            let hl = high[i] - low[i];
            let hc = (high[i] - prev_close).abs();
            let lc = (low[i] - prev_close).abs();
            hl.max(hc).max(lc)
        })
        .collect();

    let mut atr = true_ranges[..period].iter().sum::<f64>() / period as f64;
    let mut values = Vec::with_capacity(true_ranges.len() - period + 1);
    values.push(atr);

    for tr in &true_ranges[period..] {
        atr = (atr * (period - 1) as f64 + tr) / period as f64;
        values.push(atr);
    }

    values
}

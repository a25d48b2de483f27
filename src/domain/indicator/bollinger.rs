//! Bollinger Bands.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (deviations × StdDev)
//! - Lower: Middle - (deviations × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, deviations=2.0
//! Output length: same as SMA(n).

use crate::domain::indicator::BollingerBands;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_DEVIATIONS: f64 = 2.0;

pub fn calculate_bollinger(prices: &[f64], period: usize, deviations: f64) -> BollingerBands {
    if period == 0 || prices.len() < period {
        return BollingerBands::default();
    }

    let len = prices.len() - period + 1;
    let mut bands = BollingerBands {
        upper: Vec::with_capacity(len),
        middle: Vec::with_capacity(len),
        lower: Vec::with_capacity(len),
    };

    for window in prices.windows(period) {
        let middle = window.iter().sum::<f64>() / period as f64;

        let variance = window
            .iter()
            .map(|p| {
                let diff = p - middle;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        bands.middle.push(middle);
        bands.upper.push(middle + stddev * deviations);
        bands.lower.push(middle - stddev * deviations);
    }

    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_length_matches_sma() {
        let bands = calculate_bollinger(&[10.0, 20.0, 30.0, 40.0, 50.0], 3, 2.0);
        assert_eq!(bands.upper.len(), 3);
        assert_eq!(bands.middle.len(), 3);
        assert_eq!(bands.lower.len(), 3);
    }

    #[test]
    fn bollinger_constant_values() {
        let bands = calculate_bollinger(&[100.0; 5], 3, 2.0);
        for i in 0..3 {
            assert!((bands.middle[i] - 100.0).abs() < f64::EPSILON);
            assert!((bands.upper[i] - 100.0).abs() < f64::EPSILON);
            assert!((bands.lower[i] - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn bollinger_basic_calculation() {
        let bands = calculate_bollinger(&[10.0, 20.0, 30.0], 3, 2.0);

        let expected_middle: f64 = (10.0 + 20.0 + 30.0) / 3.0;
        let variance: f64 = ((10.0 - expected_middle).powi(2)
            + (20.0 - expected_middle).powi(2)
            + (30.0 - expected_middle).powi(2))
            / 3.0;
        let stddev = variance.sqrt();

        assert!((bands.middle[0] - expected_middle).abs() < 1e-10);
        assert!((bands.upper[0] - (expected_middle + 2.0 * stddev)).abs() < 1e-10);
        assert!((bands.lower[0] - (expected_middle - 2.0 * stddev)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_multiplier_variations() {
        let bands = calculate_bollinger(&[10.0, 20.0, 30.0], 3, 1.0);
        let stddev = (200.0_f64 / 3.0).sqrt();
        assert!((bands.upper[0] - (20.0 + stddev)).abs() < 1e-10);
        assert!((bands.lower[0] - (20.0 - stddev)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_symmetry() {
        let bands = calculate_bollinger(&[10.0, 20.0, 30.0], 3, 2.0);
        let upper_dist = bands.upper[0] - bands.middle[0];
        let lower_dist = bands.middle[0] - bands.lower[0];
        assert!((upper_dist - lower_dist).abs() < 1e-10);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let bands = calculate_bollinger(&[10.0, 20.0], 3, 2.0);
        assert!(bands.is_empty());
        assert!(bands.upper.is_empty());
        assert!(bands.lower.is_empty());
    }
}

//! Fibonacci retracement levels between a swing high and low.

pub const RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibonacciLevels {
    pub level_0: f64,
    pub level_236: f64,
    pub level_382: f64,
    pub level_500: f64,
    pub level_618: f64,
    pub level_786: f64,
    pub level_1000: f64,
}

impl FibonacciLevels {
    /// `(ratio, price)` pairs from the high (0%) down to the low (100%).
    pub fn levels(&self) -> [(f64, f64); 7] {
        [
            (RATIOS[0], self.level_0),
            (RATIOS[1], self.level_236),
            (RATIOS[2], self.level_382),
            (RATIOS[3], self.level_500),
            (RATIOS[4], self.level_618),
            (RATIOS[5], self.level_786),
            (RATIOS[6], self.level_1000),
        ]
    }
}

pub fn calculate_fibonacci_levels(high: f64, low: f64) -> FibonacciLevels {
    let range = high - low;
    let retrace = |ratio: f64| high - range * ratio;

    FibonacciLevels {
        level_0: high,
        level_236: retrace(0.236),
        level_382: retrace(0.382),
        level_500: retrace(0.5),
        level_618: retrace(0.618),
        level_786: retrace(0.786),
        level_1000: low,
    }
}

//! Rule evaluation over the latest two values of each series.
//!
//! # Evaluation Semantics
//!
//! - Threshold crosses compare the previous and current value of one series.
//! - Two-series crosses compare the last two values of each series; both end
//!   at the latest candle so no further alignment is needed.
//! - Band touches look at the current candle against the latest band value
//!   and carry no cross requirement, so they fire again on every period the
//!   candle stays through the band.
//! - Empty or too-short series, and any non-finite value, mean the condition
//!   is not met.

use crate::domain::candle::Candle;
use crate::domain::indicator::align::last_two;
use crate::domain::indicator_set::IndicatorSet;
use crate::domain::rule::{Condition, IndicatorKind, RuleDefinition};

/// `prev > threshold && cur <= threshold`.
pub fn crosses_below(series: &[f64], threshold: f64) -> bool {
    match last_two(series) {
        Some((prev, cur)) if all_finite(&[prev, cur, threshold]) => {
            prev > threshold && cur <= threshold
        }
        _ => false,
    }
}

/// `prev < threshold && cur >= threshold`.
pub fn crosses_above(series: &[f64], threshold: f64) -> bool {
    match last_two(series) {
        Some((prev, cur)) if all_finite(&[prev, cur, threshold]) => {
            prev < threshold && cur >= threshold
        }
        _ => false,
    }
}

/// Fast series crosses above slow: `prev_fast <= prev_slow && cur_fast > cur_slow`.
pub fn series_cross_up(fast: &[f64], slow: &[f64]) -> bool {
    match (last_two(fast), last_two(slow)) {
        (Some((pf, cf)), Some((ps, cs))) if all_finite(&[pf, cf, ps, cs]) => pf <= ps && cf > cs,
        _ => false,
    }
}

/// Fast series crosses below slow: `prev_fast >= prev_slow && cur_fast < cur_slow`.
pub fn series_cross_down(fast: &[f64], slow: &[f64]) -> bool {
    match (last_two(fast), last_two(slow)) {
        (Some((pf, cf)), Some((ps, cs))) if all_finite(&[pf, cf, ps, cs]) => pf >= ps && cf < cs,
        _ => false,
    }
}

pub fn touches_lower(candle: &Candle, lower: &[f64]) -> bool {
    match lower.last() {
        Some(&band) if all_finite(&[band, candle.low]) => candle.low <= band,
        _ => false,
    }
}

pub fn touches_upper(candle: &Candle, upper: &[f64]) -> bool {
    match upper.last() {
        Some(&band) if all_finite(&[band, candle.high]) => candle.high >= band,
        _ => false,
    }
}

/// Evaluate one rule against the current candle and the indicator set.
///
/// Disabled rules and threshold rules without a threshold never fire.
pub fn evaluate_rule(rule: &RuleDefinition, candle: &Candle, indicators: &IndicatorSet) -> bool {
    if !rule.enabled {
        return false;
    }

    match (rule.indicator(), rule.condition()) {
        (IndicatorKind::Rsi, condition) => {
            let Some(threshold) = rule.threshold else {
                return false;
            };
            match condition {
                Condition::CrossesBelow => crosses_below(&indicators.rsi, threshold),
                Condition::CrossesAbove => crosses_above(&indicators.rsi, threshold),
                _ => false,
            }
        }
        (IndicatorKind::MaCross, Condition::CrossesAbove) => {
            series_cross_up(&indicators.fast_ma, &indicators.slow_ma)
        }
        (IndicatorKind::MaCross, Condition::CrossesBelow) => {
            series_cross_down(&indicators.fast_ma, &indicators.slow_ma)
        }
        (IndicatorKind::Macd, Condition::CrossesAbove) => {
            series_cross_up(&indicators.macd.macd, &indicators.macd.signal)
        }
        (IndicatorKind::Macd, Condition::CrossesBelow) => {
            series_cross_down(&indicators.macd.macd, &indicators.macd.signal)
        }
        (IndicatorKind::Bollinger, Condition::TouchesLower) => {
            touches_lower(candle, &indicators.bollinger.lower)
        }
        (IndicatorKind::Bollinger, Condition::TouchesUpper) => {
            touches_upper(candle, &indicators.bollinger.upper)
        }
        _ => false,
    }
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

//! Per-symbol position state.
//!
//! `PositionState::default()` is the flat state. An open position lives in
//! `position`, so "in position" and "entry price set" can never disagree.

use crate::domain::candle::Candle;
use crate::domain::signal::Signal;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSide {
    Long,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenPosition {
    pub side: PositionSide,
    pub entry_price: f64,
    pub entry_time: DateTime<Utc>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl OpenPosition {
    pub fn profit_at(&self, exit_price: f64) -> f64 {
        match self.side {
            PositionSide::Long => exit_price - self.entry_price,
        }
    }

    pub fn profit_percent_at(&self, exit_price: f64) -> f64 {
        self.profit_at(exit_price) * 100.0 / self.entry_price
    }

    /// Stop price if the candle traded through it.
    pub fn stop_hit(&self, candle: &Candle) -> Option<f64> {
        let stop = self.stop_loss?;
        let hit = match self.side {
            PositionSide::Long => candle.low <= stop,
        };
        hit.then_some(stop)
    }

    /// Target price if the candle traded through it.
    pub fn target_hit(&self, candle: &Candle) -> Option<f64> {
        let target = self.take_profit?;
        let hit = match self.side {
            PositionSide::Long => candle.high >= target,
        };
        hit.then_some(target)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionState {
    pub position: Option<OpenPosition>,
    pub last_signal: Option<Signal>,
}

impl PositionState {
    pub fn in_position(&self) -> bool {
        self.position.is_some()
    }

    pub fn entry_price(&self) -> Option<f64> {
        self.position.as_ref().map(|p| p.entry_price)
    }

    pub fn entry_time(&self) -> Option<DateTime<Utc>> {
        self.position.as_ref().map(|p| p.entry_time)
    }

    pub fn stop_loss(&self) -> Option<f64> {
        self.position.as_ref().and_then(|p| p.stop_loss)
    }

    pub fn take_profit(&self) -> Option<f64> {
        self.position.as_ref().and_then(|p| p.take_profit)
    }

    pub fn side(&self) -> Option<PositionSide> {
        self.position.as_ref().map(|p| p.side)
    }

    /// Back to the flat state, clearing the last signal as well.
    pub fn reset(&mut self) {
        *self = PositionState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_position() -> OpenPosition {
        OpenPosition {
            side: PositionSide::Long,
            entry_price: 50.0,
            entry_time: Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap(),
            stop_loss: Some(45.0),
            take_profit: Some(60.0),
        }
    }

    fn bar(low: f64, high: f64) -> Candle {
        Candle {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 16, 14, 30, 0).unwrap(),
            open: low,
            high,
            low,
            close: high,
            volume: 0.0,
        }
    }

    #[test]
    fn long_profit() {
        let pos = sample_position();
        assert!((pos.profit_at(55.0) - 5.0).abs() < f64::EPSILON);
        assert!((pos.profit_percent_at(55.0) - 10.0).abs() < f64::EPSILON);
        assert!((pos.profit_at(45.0) + 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn long_stop_hit_on_low() {
        let pos = sample_position();
        assert_eq!(pos.stop_hit(&bar(45.0, 52.0)), Some(45.0));
        assert_eq!(pos.stop_hit(&bar(44.0, 52.0)), Some(45.0));
        assert_eq!(pos.stop_hit(&bar(45.5, 52.0)), None);
    }

    #[test]
    fn long_target_hit_on_high() {
        let pos = sample_position();
        assert_eq!(pos.target_hit(&bar(50.0, 60.0)), Some(60.0));
        assert_eq!(pos.target_hit(&bar(50.0, 59.9)), None);
    }

    #[test]
    fn unset_bracket_never_hits() {
        let pos = OpenPosition {
            stop_loss: None,
            take_profit: None,
            ..sample_position()
        };
        assert_eq!(pos.stop_hit(&bar(0.0, 1000.0)), None);
        assert_eq!(pos.target_hit(&bar(0.0, 1000.0)), None);
    }

    #[test]
    fn default_state_is_flat() {
        let state = PositionState::default();
        assert!(!state.in_position());
        assert_eq!(state.entry_price(), None);
        assert_eq!(state.entry_time(), None);
        assert_eq!(state.stop_loss(), None);
        assert_eq!(state.take_profit(), None);
        assert_eq!(state.side(), None);
        assert!(state.last_signal.is_none());
    }

    #[test]
    fn reset_returns_to_default() {
        let mut state = PositionState {
            position: Some(sample_position()),
            last_signal: None,
        };
        assert!(state.in_position());
        assert_eq!(state.entry_price(), Some(50.0));
        state.reset();
        assert_eq!(state, PositionState::default());
    }
}

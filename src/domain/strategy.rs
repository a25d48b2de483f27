//! Trading strategy: ordered rule lists plus the stop-loss / take-profit bracket.

use crate::domain::rule::{default_entry_rules, default_exit_rules, RuleDefinition};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopLossMode {
    /// Percent below entry.
    Percent(f64),
    /// Absolute distance below entry.
    Fixed(f64),
    /// Multiple of the latest ATR below entry.
    Atr { multiplier: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TakeProfitMode {
    Percent(f64),
    Fixed(f64),
    /// Multiple of the entry-to-stop distance above entry.
    RiskReward(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopLossConfig {
    pub enabled: bool,
    pub mode: StopLossMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TakeProfitConfig {
    pub enabled: bool,
    pub mode: TakeProfitMode,
}

pub const DEFAULT_STOP_PERCENT: f64 = 2.0;
pub const DEFAULT_TARGET_PERCENT: f64 = 3.0;
pub const DEFAULT_ATR_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_RISK_REWARD: f64 = 2.0;

impl Default for StopLossConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: StopLossMode::Percent(DEFAULT_STOP_PERCENT),
        }
    }
}

impl Default for TakeProfitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: TakeProfitMode::Percent(DEFAULT_TARGET_PERCENT),
        }
    }
}

impl StopLossConfig {
    /// Stop price for a long entry. `atr` is the latest ATR value, used only
    /// in ATR mode; a missing or non-finite ATR leaves the stop unset.
    pub fn price(&self, entry: f64, atr: Option<f64>) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        let stop = match self.mode {
            StopLossMode::Percent(pct) => entry - entry * pct / 100.0,
            StopLossMode::Fixed(distance) => entry - distance,
            StopLossMode::Atr { multiplier } => entry - atr? * multiplier,
        };
        stop.is_finite().then_some(stop)
    }

    pub fn needs_atr(&self) -> bool {
        self.enabled && matches!(self.mode, StopLossMode::Atr { .. })
    }
}

impl TakeProfitConfig {
    /// Target price for a long entry. Risk-reward mode needs a stop.
    pub fn price(&self, entry: f64, stop: Option<f64>) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        let target = match self.mode {
            TakeProfitMode::Percent(pct) => entry + entry * pct / 100.0,
            TakeProfitMode::Fixed(distance) => entry + distance,
            TakeProfitMode::RiskReward(ratio) => entry + (entry - stop?) * ratio,
        };
        target.is_finite().then_some(target)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub entry_rules: Vec<RuleDefinition>,
    pub exit_rules: Vec<RuleDefinition>,
    pub stop_loss: StopLossConfig,
    pub take_profit: TakeProfitConfig,
}

impl Default for Strategy {
    fn default() -> Self {
        Self {
            entry_rules: default_entry_rules(),
            exit_rules: default_exit_rules(),
            stop_loss: StopLossConfig::default(),
            take_profit: TakeProfitConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bracket_on_100() {
        let strategy = Strategy::default();
        let stop = strategy.stop_loss.price(100.0, None);
        assert_eq!(stop, Some(98.0));
        assert_eq!(strategy.take_profit.price(100.0, stop), Some(103.0));
    }

    #[test]
    fn fixed_modes() {
        let sl = StopLossConfig {
            enabled: true,
            mode: StopLossMode::Fixed(1.5),
        };
        let tp = TakeProfitConfig {
            enabled: true,
            mode: TakeProfitMode::Fixed(4.0),
        };
        assert_eq!(sl.price(50.0, None), Some(48.5));
        assert_eq!(tp.price(50.0, None), Some(54.0));
    }

    #[test]
    fn atr_stop_uses_multiplier() {
        let sl = StopLossConfig {
            enabled: true,
            mode: StopLossMode::Atr { multiplier: 2.0 },
        };
        assert_eq!(sl.price(100.0, Some(1.5)), Some(97.0));
        assert!(sl.needs_atr());
    }

    #[test]
    fn atr_stop_without_atr_is_unset() {
        let sl = StopLossConfig {
            enabled: true,
            mode: StopLossMode::Atr { multiplier: 2.0 },
        };
        assert_eq!(sl.price(100.0, None), None);
        assert_eq!(sl.price(100.0, Some(f64::NAN)), None);
    }

    #[test]
    fn risk_reward_target() {
        let tp = TakeProfitConfig {
            enabled: true,
            mode: TakeProfitMode::RiskReward(2.0),
        };
        assert_eq!(tp.price(100.0, Some(98.0)), Some(104.0));
        assert_eq!(tp.price(100.0, None), None);
    }

    #[test]
    fn disabled_bracket_is_unset() {
        let sl = StopLossConfig {
            enabled: false,
            ..Default::default()
        };
        let tp = TakeProfitConfig {
            enabled: false,
            ..Default::default()
        };
        assert_eq!(sl.price(100.0, None), None);
        assert_eq!(tp.price(100.0, Some(98.0)), None);
        assert!(!sl.needs_atr());
    }

    #[test]
    fn default_strategy_rules() {
        let s = Strategy::default();
        assert_eq!(s.entry_rules.len(), 4);
        assert_eq!(s.exit_rules.len(), 4);
        assert_eq!(s.entry_rules[0].id, "rsi-oversold");
        assert_eq!(s.exit_rules[0].id, "rsi-overbought");
    }
}

//! Configuration validation.
//!
//! Strict counterpart of `settings::load_settings`: anything the loader would
//! skip with a warning is reported here as an error.

use crate::domain::error::CandlewatchError;
use crate::domain::rule::{RuleKind, DEFAULT_ENTRY_ORDER, DEFAULT_EXIT_ORDER};
use crate::domain::settings::{load_settings, parse_id_list, Settings};
use crate::domain::strategy::{StopLossMode, TakeProfitMode};
use crate::ports::config_port::ConfigPort;

/// Load and validate; returns the settings when every check passes.
pub fn validate_config(config: &dyn ConfigPort) -> Result<Settings, CandlewatchError> {
    validate_rule_lists(config, "entry")?;
    validate_rule_lists(config, "exit")?;
    let settings = load_settings(config)?;
    validate_general(&settings)?;
    validate_indicators(&settings)?;
    validate_rule_thresholds(config, &settings)?;
    validate_bracket(&settings)?;
    Ok(settings)
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> CandlewatchError {
    CandlewatchError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_general(settings: &Settings) -> Result<(), CandlewatchError> {
    if settings.general.window < 2 {
        return Err(invalid("general", "window", "window must be at least 2"));
    }
    Ok(())
}

fn require_period(key: &str, value: usize) -> Result<(), CandlewatchError> {
    if value == 0 {
        return Err(invalid("indicators", key, format!("{} must be at least 1", key)));
    }
    Ok(())
}

fn validate_indicators(settings: &Settings) -> Result<(), CandlewatchError> {
    let ind = &settings.indicators;

    require_period("rsi_period", ind.rsi.period)?;
    if !(0.0..=100.0).contains(&ind.rsi.oversold) || !(0.0..=100.0).contains(&ind.rsi.overbought)
    {
        return Err(invalid(
            "indicators",
            "rsi_oversold",
            "RSI levels must be between 0 and 100",
        ));
    }
    if ind.rsi.oversold >= ind.rsi.overbought {
        return Err(invalid(
            "indicators",
            "rsi_oversold",
            "rsi_oversold must be below rsi_overbought",
        ));
    }

    require_period("ma_fast", ind.ma.fast)?;
    require_period("ma_slow", ind.ma.slow)?;
    if ind.ma.fast >= ind.ma.slow {
        return Err(invalid("indicators", "ma_fast", "ma_fast must be below ma_slow"));
    }

    require_period("bollinger_period", ind.bollinger.period)?;
    if ind.bollinger.deviation < 0.0 {
        return Err(invalid(
            "indicators",
            "bollinger_deviation",
            "bollinger_deviation must be non-negative",
        ));
    }

    require_period("macd_fast", ind.macd.fast)?;
    require_period("macd_slow", ind.macd.slow)?;
    require_period("macd_signal", ind.macd.signal)?;
    if ind.macd.fast >= ind.macd.slow {
        return Err(invalid("indicators", "macd_fast", "macd_fast must be below macd_slow"));
    }

    require_period("stochastic_period", ind.stochastic.period)?;
    require_period("stochastic_smooth_k", ind.stochastic.smooth_k)?;
    require_period("stochastic_smooth_d", ind.stochastic.smooth_d)?;
    require_period("atr_period", ind.atr.period)?;
    Ok(())
}

fn validate_rule_lists(config: &dyn ConfigPort, section: &str) -> Result<(), CandlewatchError> {
    let catalogue = section_catalogue(section);
    let resolve = |id: &str, key: &str| {
        RuleKind::from_id(id)
            .filter(|kind| catalogue.contains(kind))
            .ok_or_else(|| CandlewatchError::RuleInvalid {
                reason: format!("unknown rule id '{}' in [{}] {}", id, section, key),
            })
    };

    let listed = config.get_string(section, "rules").map(|s| parse_id_list(&s));
    if let Some(ids) = &listed {
        for id in ids {
            resolve(id, "rules")?;
        }
    }

    if let Some(enabled) = config.get_string(section, "enabled") {
        for id in parse_id_list(&enabled) {
            resolve(&id, "enabled")?;
            if listed.as_ref().is_some_and(|ids| !ids.contains(&id)) {
                return Err(CandlewatchError::RuleInvalid {
                    reason: format!("rule '{}' is enabled but not listed in [{}] rules", id, section),
                });
            }
        }
    }
    Ok(())
}

fn section_catalogue(section: &str) -> &'static [RuleKind] {
    match section {
        "entry" => &DEFAULT_ENTRY_ORDER,
        _ => &DEFAULT_EXIT_ORDER,
    }
}

fn validate_rule_thresholds(
    config: &dyn ConfigPort,
    settings: &Settings,
) -> Result<(), CandlewatchError> {
    let rules = settings
        .strategy
        .entry_rules
        .iter()
        .chain(&settings.strategy.exit_rules);

    for rule in rules {
        if !rule.kind.requires_threshold() {
            continue;
        }
        match rule.threshold {
            Some(t) if (0.0..=100.0).contains(&t) => {}
            Some(t) => {
                return Err(CandlewatchError::RuleInvalid {
                    reason: format!("rule '{}' threshold {} is outside 0..=100", rule.id, t),
                })
            }
            None => {
                let raw = config
                    .get_string(&format!("rule:{}", rule.id), "threshold")
                    .unwrap_or_default();
                return Err(CandlewatchError::RuleInvalid {
                    reason: format!("rule '{}' has an invalid threshold '{}'", rule.id, raw),
                });
            }
        }
    }
    Ok(())
}

fn validate_bracket(settings: &Settings) -> Result<(), CandlewatchError> {
    let sl = &settings.strategy.stop_loss;
    if sl.enabled {
        let (key, value) = match sl.mode {
            StopLossMode::Percent(v) | StopLossMode::Fixed(v) => ("value", v),
            StopLossMode::Atr { multiplier } => ("atr_multiplier", multiplier),
        };
        if value <= 0.0 {
            return Err(invalid("stop_loss", key, format!("{} must be positive", key)));
        }
        if let StopLossMode::Percent(pct) = sl.mode {
            if pct >= 100.0 {
                return Err(invalid("stop_loss", "value", "percent stop must be below 100"));
            }
        }
    }

    let tp = &settings.strategy.take_profit;
    if tp.enabled {
        let (key, value) = match tp.mode {
            TakeProfitMode::Percent(v) | TakeProfitMode::Fixed(v) => ("value", v),
            TakeProfitMode::RiskReward(ratio) => ("risk_reward_ratio", ratio),
        };
        if value <= 0.0 {
            return Err(invalid("take_profit", key, format!("{} must be positive", key)));
        }
        if matches!(tp.mode, TakeProfitMode::RiskReward(_)) && !sl.enabled {
            return Err(invalid(
                "take_profit",
                "type",
                "risk-reward take-profit needs an enabled stop-loss",
            ));
        }
    }
    Ok(())
}

//! User settings and their INI representation.
//!
//! Loading is lenient: unknown rule ids and unparseable thresholds are logged
//! and skipped so the remaining rules still run. Structural problems (an
//! unknown moving-average or bracket mode, a negative period) fail the load.
//! `config_validation` applies the strict checks used by `validate`.

use crate::domain::error::CandlewatchError;
use crate::domain::indicator::{atr, bollinger, macd, rsi, stochastic};
use crate::domain::rule::{
    RuleDefinition, RuleKind, DEFAULT_ENTRY_ORDER, DEFAULT_EXIT_ORDER, DEFAULT_OVERBOUGHT,
    DEFAULT_OVERSOLD,
};
use crate::domain::strategy::{
    StopLossConfig, StopLossMode, Strategy, TakeProfitConfig, TakeProfitMode,
    DEFAULT_ATR_MULTIPLIER, DEFAULT_RISK_REWARD, DEFAULT_STOP_PERCENT, DEFAULT_TARGET_PERCENT,
};
use crate::ports::config_port::ConfigPort;
use tracing::warn;

pub const DEFAULT_WINDOW: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaType {
    Sma,
    Ema,
}

impl MaType {
    pub fn parse(s: &str) -> Option<MaType> {
        match s.trim().to_lowercase().as_str() {
            "sma" => Some(MaType::Sma),
            "ema" => Some(MaType::Ema),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiSettings {
    pub enabled: bool,
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaSettings {
    pub enabled: bool,
    pub fast: usize,
    pub slow: usize,
    pub ma_type: MaType,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerSettings {
    pub enabled: bool,
    pub period: usize,
    pub deviation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdSettings {
    pub enabled: bool,
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticSettings {
    pub enabled: bool,
    pub period: usize,
    pub smooth_k: usize,
    pub smooth_d: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtrSettings {
    pub enabled: bool,
    pub period: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSettings {
    pub rsi: RsiSettings,
    pub ma: MaSettings,
    pub bollinger: BollingerSettings,
    pub macd: MacdSettings,
    pub stochastic: StochasticSettings,
    pub atr: AtrSettings,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            rsi: RsiSettings {
                enabled: true,
                period: rsi::DEFAULT_PERIOD,
                overbought: DEFAULT_OVERBOUGHT,
                oversold: DEFAULT_OVERSOLD,
            },
            ma: MaSettings {
                enabled: false,
                fast: 9,
                slow: 21,
                ma_type: MaType::Ema,
            },
            bollinger: BollingerSettings {
                enabled: false,
                period: bollinger::DEFAULT_PERIOD,
                deviation: bollinger::DEFAULT_DEVIATIONS,
            },
            macd: MacdSettings {
                enabled: false,
                fast: macd::DEFAULT_FAST,
                slow: macd::DEFAULT_SLOW,
                signal: macd::DEFAULT_SIGNAL,
            },
            stochastic: StochasticSettings {
                enabled: false,
                period: stochastic::DEFAULT_PERIOD,
                smooth_k: stochastic::DEFAULT_SMOOTH_K,
                smooth_d: stochastic::DEFAULT_SMOOTH_D,
            },
            atr: AtrSettings {
                enabled: false,
                period: atr::DEFAULT_PERIOD,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationSettings {
    pub notify_entry: bool,
    pub notify_exit: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            notify_entry: true,
            notify_exit: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralSettings {
    pub symbol: Option<String>,
    pub window: usize,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            symbol: None,
            window: DEFAULT_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub general: GeneralSettings,
    pub indicators: IndicatorSettings,
    pub strategy: Strategy,
    pub notifications: NotificationSettings,
}

impl Settings {
    /// Indicator settings actually needed for evaluation: ATR is switched on
    /// when the stop-loss runs in ATR mode.
    pub fn effective_indicators(&self) -> IndicatorSettings {
        let mut indicators = self.indicators;
        if self.strategy.stop_loss.needs_atr() {
            indicators.atr.enabled = true;
        }
        indicators
    }
}

pub fn load_settings(config: &dyn ConfigPort) -> Result<Settings, CandlewatchError> {
    let general = load_general(config)?;
    let indicators = load_indicators(config)?;
    let strategy = Strategy {
        entry_rules: load_rules(config, "entry", &DEFAULT_ENTRY_ORDER, &indicators.rsi),
        exit_rules: load_rules(config, "exit", &DEFAULT_EXIT_ORDER, &indicators.rsi),
        stop_loss: load_stop_loss(config)?,
        take_profit: load_take_profit(config)?,
    };
    let notifications = NotificationSettings {
        notify_entry: config.get_bool("notifications", "notify_entry", true),
        notify_exit: config.get_bool("notifications", "notify_exit", true),
    };

    Ok(Settings {
        general,
        indicators,
        strategy,
        notifications,
    })
}

fn load_general(config: &dyn ConfigPort) -> Result<GeneralSettings, CandlewatchError> {
    let symbol = config
        .get_string("general", "symbol")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    Ok(GeneralSettings {
        symbol,
        window: get_usize(config, "general", "window", DEFAULT_WINDOW)?,
    })
}

fn load_indicators(config: &dyn ConfigPort) -> Result<IndicatorSettings, CandlewatchError> {
    let d = IndicatorSettings::default();
    let section = "indicators";

    let ma_type = match config.get_string(section, "ma_type") {
        Some(s) => MaType::parse(&s).ok_or_else(|| CandlewatchError::ConfigInvalid {
            section: section.to_string(),
            key: "ma_type".to_string(),
            reason: format!("unknown moving average type '{}', expected sma or ema", s),
        })?,
        None => d.ma.ma_type,
    };

    Ok(IndicatorSettings {
        rsi: RsiSettings {
            enabled: config.get_bool(section, "rsi_enabled", d.rsi.enabled),
            period: get_usize(config, section, "rsi_period", d.rsi.period)?,
            overbought: config.get_double(section, "rsi_overbought", d.rsi.overbought),
            oversold: config.get_double(section, "rsi_oversold", d.rsi.oversold),
        },
        ma: MaSettings {
            enabled: config.get_bool(section, "ma_enabled", d.ma.enabled),
            fast: get_usize(config, section, "ma_fast", d.ma.fast)?,
            slow: get_usize(config, section, "ma_slow", d.ma.slow)?,
            ma_type,
        },
        bollinger: BollingerSettings {
            enabled: config.get_bool(section, "bollinger_enabled", d.bollinger.enabled),
            period: get_usize(config, section, "bollinger_period", d.bollinger.period)?,
            deviation: config.get_double(section, "bollinger_deviation", d.bollinger.deviation),
        },
        macd: MacdSettings {
            enabled: config.get_bool(section, "macd_enabled", d.macd.enabled),
            fast: get_usize(config, section, "macd_fast", d.macd.fast)?,
            slow: get_usize(config, section, "macd_slow", d.macd.slow)?,
            signal: get_usize(config, section, "macd_signal", d.macd.signal)?,
        },
        stochastic: StochasticSettings {
            enabled: config.get_bool(section, "stochastic_enabled", d.stochastic.enabled),
            period: get_usize(config, section, "stochastic_period", d.stochastic.period)?,
            smooth_k: get_usize(config, section, "stochastic_smooth_k", d.stochastic.smooth_k)?,
            smooth_d: get_usize(config, section, "stochastic_smooth_d", d.stochastic.smooth_d)?,
        },
        atr: AtrSettings {
            enabled: config.get_bool(section, "atr_enabled", d.atr.enabled),
            period: get_usize(config, section, "atr_period", d.atr.period)?,
        },
    })
}

fn load_stop_loss(config: &dyn ConfigPort) -> Result<StopLossConfig, CandlewatchError> {
    let section = "stop_loss";
    let value = config.get_double(section, "value", DEFAULT_STOP_PERCENT);
    let kind = config
        .get_string(section, "type")
        .unwrap_or_else(|| "percent".to_string());
    let mode = match kind.trim().to_lowercase().as_str() {
        "percent" => StopLossMode::Percent(value),
        "fixed" => StopLossMode::Fixed(value),
        "atr" => StopLossMode::Atr {
            multiplier: config.get_double(section, "atr_multiplier", DEFAULT_ATR_MULTIPLIER),
        },
        other => {
            return Err(CandlewatchError::ConfigInvalid {
                section: section.to_string(),
                key: "type".to_string(),
                reason: format!("unknown stop-loss type '{}', expected percent, fixed or atr", other),
            })
        }
    };
    Ok(StopLossConfig {
        enabled: config.get_bool(section, "enabled", true),
        mode,
    })
}

fn load_take_profit(config: &dyn ConfigPort) -> Result<TakeProfitConfig, CandlewatchError> {
    let section = "take_profit";
    let value = config.get_double(section, "value", DEFAULT_TARGET_PERCENT);
    let kind = config
        .get_string(section, "type")
        .unwrap_or_else(|| "percent".to_string());
    let mode = match kind.trim().to_lowercase().as_str() {
        "percent" => TakeProfitMode::Percent(value),
        "fixed" => TakeProfitMode::Fixed(value),
        "risk-reward" => TakeProfitMode::RiskReward(config.get_double(
            section,
            "risk_reward_ratio",
            DEFAULT_RISK_REWARD,
        )),
        other => {
            return Err(CandlewatchError::ConfigInvalid {
                section: section.to_string(),
                key: "type".to_string(),
                reason: format!(
                    "unknown take-profit type '{}', expected percent, fixed or risk-reward",
                    other
                ),
            })
        }
    };
    Ok(TakeProfitConfig {
        enabled: config.get_bool(section, "enabled", true),
        mode,
    })
}

/// Comma-separated id list, trimmed, empties dropped.
pub fn parse_id_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn load_rules(
    config: &dyn ConfigPort,
    section: &str,
    stock_order: &[RuleKind],
    rsi: &RsiSettings,
) -> Vec<RuleDefinition> {
    let ids = match config.get_string(section, "rules") {
        Some(list) => parse_id_list(&list),
        None => stock_order.iter().map(|k| k.id().to_string()).collect(),
    };
    // The first stock rule (the RSI rule) is the only one on by default.
    let enabled_ids = match config.get_string(section, "enabled") {
        Some(list) => parse_id_list(&list),
        None => stock_order
            .first()
            .map(|k| vec![k.id().to_string()])
            .unwrap_or_default(),
    };

    for id in &enabled_ids {
        if !ids.contains(id) {
            warn!(section, rule = %id, "enabled rule is not in the rule list");
        }
    }

    let mut rules = Vec::with_capacity(ids.len());
    for id in &ids {
        let Some(kind) = RuleKind::from_id(id).filter(|k| stock_order.contains(k)) else {
            warn!(section, rule = %id, "skipping rule id unknown to this section");
            continue;
        };

        let mut rule = RuleDefinition::stock(kind).enabled(enabled_ids.contains(id));
        rule.threshold = match kind {
            RuleKind::RsiOversold => Some(rsi.oversold),
            RuleKind::RsiOverbought => Some(rsi.overbought),
            _ => None,
        };

        let rule_section = format!("rule:{}", id);
        if let Some(raw) = config.get_string(&rule_section, "threshold") {
            rule.threshold = match raw.trim().parse::<f64>() {
                Ok(t) if t.is_finite() => Some(t),
                _ => {
                    warn!(rule = %id, threshold = %raw, "ignoring unparseable threshold");
                    None
                }
            };
        }
        if let Some(name) = config.get_string(&rule_section, "name") {
            rule.name = name;
        }
        if let Some(description) = config.get_string(&rule_section, "description") {
            rule.description = description;
        }
        rule.enabled = config.get_bool(&rule_section, "enabled", rule.enabled);

        if rule.enabled && kind.requires_threshold() && rule.threshold.is_none() {
            warn!(rule = %id, "threshold rule has no threshold and will never fire");
        }
        rules.push(rule);
    }
    rules
}

pub(crate) fn get_usize(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, CandlewatchError> {
    let value = config.get_int(section, key, default as i64);
    usize::try_from(value).map_err(|_| CandlewatchError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("{} must be non-negative", key),
    })
}

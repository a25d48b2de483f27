//! Rule definitions for entry and exit signals.
//!
//! A rule set is an ordered `Vec<RuleDefinition>`; evaluation walks it in
//! declared order and the first rule that fires wins. Each definition carries
//! a tagged `RuleKind` that fixes which indicator it reads and which
//! condition it tests.

use std::fmt;

/// Which indicator series a rule reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Rsi,
    MaCross,
    Bollinger,
    Macd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    CrossesBelow,
    CrossesAbove,
    TouchesLower,
    TouchesUpper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    RsiOversold,
    RsiOverbought,
    MaCrossUp,
    MaCrossDown,
    BollingerLowerTouch,
    BollingerUpperTouch,
    MacdCrossUp,
    MacdCrossDown,
}

impl RuleKind {
    pub const ALL: [RuleKind; 8] = [
        RuleKind::RsiOversold,
        RuleKind::RsiOverbought,
        RuleKind::MaCrossUp,
        RuleKind::MaCrossDown,
        RuleKind::BollingerLowerTouch,
        RuleKind::BollingerUpperTouch,
        RuleKind::MacdCrossUp,
        RuleKind::MacdCrossDown,
    ];

    pub fn from_id(id: &str) -> Option<RuleKind> {
        RuleKind::ALL.into_iter().find(|k| k.id() == id)
    }

    pub fn id(&self) -> &'static str {
        match self {
            RuleKind::RsiOversold => "rsi-oversold",
            RuleKind::RsiOverbought => "rsi-overbought",
            RuleKind::MaCrossUp => "ma-cross-up",
            RuleKind::MaCrossDown => "ma-cross-down",
            RuleKind::BollingerLowerTouch => "bb-lower-touch",
            RuleKind::BollingerUpperTouch => "bb-upper-touch",
            RuleKind::MacdCrossUp => "macd-cross-up",
            RuleKind::MacdCrossDown => "macd-cross-down",
        }
    }

    pub fn indicator(&self) -> IndicatorKind {
        match self {
            RuleKind::RsiOversold | RuleKind::RsiOverbought => IndicatorKind::Rsi,
            RuleKind::MaCrossUp | RuleKind::MaCrossDown => IndicatorKind::MaCross,
            RuleKind::BollingerLowerTouch | RuleKind::BollingerUpperTouch => {
                IndicatorKind::Bollinger
            }
            RuleKind::MacdCrossUp | RuleKind::MacdCrossDown => IndicatorKind::Macd,
        }
    }

    pub fn condition(&self) -> Condition {
        match self {
            RuleKind::RsiOversold | RuleKind::MaCrossDown | RuleKind::MacdCrossDown => {
                Condition::CrossesBelow
            }
            RuleKind::RsiOverbought | RuleKind::MaCrossUp | RuleKind::MacdCrossUp => {
                Condition::CrossesAbove
            }
            RuleKind::BollingerLowerTouch => Condition::TouchesLower,
            RuleKind::BollingerUpperTouch => Condition::TouchesUpper,
        }
    }

    /// Threshold-cross rules compare against a configured level.
    pub fn requires_threshold(&self) -> bool {
        self.indicator() == IndicatorKind::Rsi
    }

    fn default_name(&self) -> &'static str {
        match self {
            RuleKind::RsiOversold => "RSI Oversold",
            RuleKind::RsiOverbought => "RSI Overbought",
            RuleKind::MaCrossUp => "MA Cross Up",
            RuleKind::MaCrossDown => "MA Cross Down",
            RuleKind::BollingerLowerTouch => "Lower Band Touch",
            RuleKind::BollingerUpperTouch => "Upper Band Touch",
            RuleKind::MacdCrossUp => "MACD Cross Up",
            RuleKind::MacdCrossDown => "MACD Cross Down",
        }
    }

    fn default_description(&self) -> &'static str {
        match self {
            RuleKind::RsiOversold => "Enter when RSI crosses below the oversold level",
            RuleKind::RsiOverbought => "Exit when RSI crosses above the overbought level",
            RuleKind::MaCrossUp => "Enter when the fast average crosses above the slow average",
            RuleKind::MaCrossDown => "Exit when the fast average crosses below the slow average",
            RuleKind::BollingerLowerTouch => "Enter when price touches the lower Bollinger band",
            RuleKind::BollingerUpperTouch => "Exit when price touches the upper Bollinger band",
            RuleKind::MacdCrossUp => "Enter when the MACD line crosses above the signal line",
            RuleKind::MacdCrossDown => "Exit when the MACD line crosses below the signal line",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: RuleKind,
    pub threshold: Option<f64>,
    pub enabled: bool,
}

impl RuleDefinition {
    /// Stock definition for `kind`, disabled, without a threshold.
    pub fn stock(kind: RuleKind) -> Self {
        Self {
            id: kind.id().to_string(),
            name: kind.default_name().to_string(),
            description: kind.default_description().to_string(),
            kind,
            threshold: None,
            enabled: false,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn indicator(&self) -> IndicatorKind {
        self.kind.indicator()
    }

    pub fn condition(&self) -> Condition {
        self.kind.condition()
    }
}

pub const DEFAULT_OVERSOLD: f64 = 30.0;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;

pub const DEFAULT_ENTRY_ORDER: [RuleKind; 4] = [
    RuleKind::RsiOversold,
    RuleKind::MaCrossUp,
    RuleKind::BollingerLowerTouch,
    RuleKind::MacdCrossUp,
];

pub const DEFAULT_EXIT_ORDER: [RuleKind; 4] = [
    RuleKind::RsiOverbought,
    RuleKind::MaCrossDown,
    RuleKind::BollingerUpperTouch,
    RuleKind::MacdCrossDown,
];

/// Stock entry rules: only `rsi-oversold` (30) is enabled.
pub fn default_entry_rules() -> Vec<RuleDefinition> {
    DEFAULT_ENTRY_ORDER
        .into_iter()
        .map(|kind| match kind {
            RuleKind::RsiOversold => RuleDefinition::stock(kind)
                .with_threshold(DEFAULT_OVERSOLD)
                .enabled(true),
            _ => RuleDefinition::stock(kind),
        })
        .collect()
}

/// Stock exit rules: only `rsi-overbought` (70) is enabled.
pub fn default_exit_rules() -> Vec<RuleDefinition> {
    DEFAULT_EXIT_ORDER
        .into_iter()
        .map(|kind| match kind {
            RuleKind::RsiOverbought => RuleDefinition::stock(kind)
                .with_threshold(DEFAULT_OVERBOUGHT)
                .enabled(true),
            _ => RuleDefinition::stock(kind),
        })
        .collect()
}

//! Trading signal state machine.
//!
//! One call to [`evaluate`] looks at the latest candle and the indicator set
//! computed over the same window, and emits at most one signal:
//!
//! - **Flat**: enabled entry rules in declared order; the first that fires
//!   opens a long position at the current close with a bracket computed from
//!   the strategy.
//! - **Long**: stop-loss (candle low) then take-profit (candle high) are
//!   checked before the exit rules; the first hit closes the position and the
//!   state returns to its default.
//!
//! Fewer than two candles leaves the state untouched and returns `None`.

use crate::domain::candle::Candle;
use crate::domain::indicator_set::IndicatorSet;
use crate::domain::position::{OpenPosition, PositionSide, PositionState};
use crate::domain::rule::RuleDefinition;
use crate::domain::rule_eval::evaluate_rule;
use crate::domain::signal::{
    EntrySignal, ExitReason, ExitSignal, Signal, STOP_LOSS_RULE, TAKE_PROFIT_RULE,
};
use crate::domain::strategy::Strategy;
use tracing::debug;

pub const MIN_CANDLES: usize = 2;

pub fn evaluate(
    strategy: &Strategy,
    state: &mut PositionState,
    candles: &[Candle],
    indicators: &IndicatorSet,
) -> Option<Signal> {
    if candles.len() < MIN_CANDLES {
        return None;
    }
    let candle = candles.last()?;

    match state.position.take() {
        None => {
            let entry = check_entry(strategy, candle, indicators)?;
            state.position = Some(OpenPosition {
                side: PositionSide::Long,
                entry_price: entry.price,
                entry_time: entry.time,
                stop_loss: entry.stop_loss,
                take_profit: entry.take_profit,
            });
            let signal = Signal::Entry(entry);
            state.last_signal = Some(signal.clone());
            Some(signal)
        }
        Some(position) => match check_exit(strategy, &position, candle, indicators) {
            Some(exit) => {
                debug!(
                    rule = %exit.rule,
                    exit_price = exit.exit_price,
                    profit = exit.profit,
                    "position closed"
                );
                state.reset();
                Some(Signal::Exit(exit))
            }
            None => {
                state.position = Some(position);
                None
            }
        },
    }
}

fn first_firing<'a>(
    rules: &'a [RuleDefinition],
    candle: &Candle,
    indicators: &IndicatorSet,
) -> Option<&'a RuleDefinition> {
    rules
        .iter()
        .filter(|rule| rule.enabled)
        .find(|rule| evaluate_rule(rule, candle, indicators))
}

fn check_entry(
    strategy: &Strategy,
    candle: &Candle,
    indicators: &IndicatorSet,
) -> Option<EntrySignal> {
    let rule = first_firing(&strategy.entry_rules, candle, indicators)?;
    let price = candle.close;
    let atr = indicators.atr.last().copied();
    let stop_loss = strategy.stop_loss.price(price, atr);
    let take_profit = strategy.take_profit.price(price, stop_loss);

    debug!(
        rule = %rule.id,
        price,
        stop_loss = ?stop_loss,
        take_profit = ?take_profit,
        "entry rule fired"
    );

    Some(EntrySignal {
        price,
        time: candle.timestamp,
        rule_id: rule.id.clone(),
        rule: rule.name.clone(),
        description: rule.description.clone(),
        stop_loss,
        take_profit,
    })
}

fn check_exit(
    strategy: &Strategy,
    position: &OpenPosition,
    candle: &Candle,
    indicators: &IndicatorSet,
) -> Option<ExitSignal> {
    let (exit_price, rule, reason) = if let Some(stop) = position.stop_hit(candle) {
        (stop, STOP_LOSS_RULE.to_string(), ExitReason::StopLoss)
    } else if let Some(target) = position.target_hit(candle) {
        (target, TAKE_PROFIT_RULE.to_string(), ExitReason::TakeProfit)
    } else {
        let rule = first_firing(&strategy.exit_rules, candle, indicators)?;
        debug!(rule = %rule.id, "exit rule fired");
        (candle.close, rule.name.clone(), ExitReason::Rule)
    };

    Some(ExitSignal {
        entry_price: position.entry_price,
        exit_price,
        entry_time: position.entry_time,
        exit_time: candle.timestamp,
        profit: position.profit_at(exit_price),
        profit_percent: position.profit_percent_at(exit_price),
        rule,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::BollingerBands;
    use crate::domain::rule::{RuleDefinition, RuleKind};
    use crate::domain::strategy::{StopLossConfig, StopLossMode, TakeProfitConfig};
    use chrono::{Duration, TimeZone, Utc};

    fn make_candles(closes: &[f64]) -> Vec<Candle> {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 13, 30, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                timestamp: start + Duration::minutes(5 * i as i64),
                open: close,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 100.0,
            })
            .collect()
    }

    fn rsi_set(prev: f64, cur: f64) -> IndicatorSet {
        IndicatorSet {
            rsi: vec![prev, cur],
            ..Default::default()
        }
    }

    fn entered_state(strategy: &Strategy) -> PositionState {
        let mut state = PositionState::default();
        let candles = make_candles(&[101.0, 100.0]);
        let signal = evaluate(strategy, &mut state, &candles, &rsi_set(35.0, 28.0));
        assert!(matches!(signal, Some(Signal::Entry(_))));
        state
    }

    #[test]
    fn fewer_than_two_candles_is_noop() {
        let strategy = Strategy::default();
        let mut state = PositionState::default();
        let candles = make_candles(&[100.0]);
        assert!(evaluate(&strategy, &mut state, &candles, &rsi_set(35.0, 28.0)).is_none());
        assert_eq!(state, PositionState::default());
        assert!(evaluate(&strategy, &mut state, &[], &rsi_set(35.0, 28.0)).is_none());
    }

    #[test]
    fn entry_records_position_and_bracket() {
        let strategy = Strategy::default();
        let mut state = PositionState::default();
        let candles = make_candles(&[101.0, 100.0]);

        let signal = evaluate(&strategy, &mut state, &candles, &rsi_set(35.0, 28.0));
        let Some(Signal::Entry(entry)) = signal else {
            panic!("expected entry signal");
        };
        assert_eq!(entry.price, 100.0);
        assert_eq!(entry.time, candles[1].timestamp);
        assert_eq!(entry.rule_id, "rsi-oversold");
        assert_eq!(entry.rule, "RSI Oversold");
        assert_eq!(entry.stop_loss, Some(98.0));
        assert_eq!(entry.take_profit, Some(103.0));

        assert!(state.in_position());
        assert_eq!(state.entry_price(), Some(100.0));
        assert_eq!(state.stop_loss(), Some(98.0));
        assert_eq!(state.take_profit(), Some(103.0));
        assert_eq!(state.side(), Some(PositionSide::Long));
        assert!(matches!(state.last_signal, Some(Signal::Entry(_))));
    }

    #[test]
    fn no_rule_fires_leaves_state() {
        let strategy = Strategy::default();
        let mut state = PositionState::default();
        let candles = make_candles(&[101.0, 100.0]);
        assert!(evaluate(&strategy, &mut state, &candles, &rsi_set(45.0, 40.0)).is_none());
        assert_eq!(state, PositionState::default());

        let mut state = entered_state(&strategy);
        let before = state.clone();
        let candles = make_candles(&[100.0, 100.5]);
        assert!(evaluate(&strategy, &mut state, &candles, &rsi_set(50.0, 55.0)).is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn no_reentry_while_in_position() {
        let strategy = Strategy::default();
        let mut state = entered_state(&strategy);
        let candles = make_candles(&[100.0, 99.5]);
        // Entry condition holds again but the position is already open.
        let signal = evaluate(&strategy, &mut state, &candles, &rsi_set(31.0, 29.0));
        assert!(signal.is_none());
        assert_eq!(state.entry_price(), Some(100.0));
    }

    #[test]
    fn take_profit_exit_uses_target_price() {
        let strategy = Strategy::default();
        let mut state = entered_state(&strategy);

        let mut candles = make_candles(&[100.0, 102.0]);
        candles[1].high = 103.5;
        let signal = evaluate(&strategy, &mut state, &candles, &rsi_set(50.0, 55.0));
        let Some(Signal::Exit(exit)) = signal else {
            panic!("expected exit signal");
        };
        assert_eq!(exit.exit_price, 103.0);
        assert_eq!(exit.profit, 3.0);
        assert_eq!(exit.profit_percent, 3.0);
        assert_eq!(exit.rule, "Take Profit");
        assert_eq!(exit.reason, ExitReason::TakeProfit);
        assert_eq!(state, PositionState::default());
    }

    #[test]
    fn stop_loss_checked_before_take_profit() {
        let strategy = Strategy::default();
        let mut state = entered_state(&strategy);

        // Wide candle through both levels.
        let mut candles = make_candles(&[100.0, 100.0]);
        candles[1].low = 97.0;
        candles[1].high = 104.0;
        let signal = evaluate(&strategy, &mut state, &candles, &rsi_set(50.0, 55.0));
        let Some(Signal::Exit(exit)) = signal else {
            panic!("expected exit signal");
        };
        assert_eq!(exit.exit_price, 98.0);
        assert_eq!(exit.profit, -2.0);
        assert_eq!(exit.rule, "Stop Loss");
        assert_eq!(exit.reason, ExitReason::StopLoss);
    }

    #[test]
    fn bracket_checked_before_exit_rules() {
        let strategy = Strategy::default();
        let mut state = entered_state(&strategy);

        let mut candles = make_candles(&[100.0, 98.5]);
        candles[1].low = 97.5;
        // RSI overbought would also fire.
        let signal = evaluate(&strategy, &mut state, &candles, &rsi_set(65.0, 72.0));
        assert!(matches!(
            signal,
            Some(Signal::Exit(ExitSignal {
                reason: ExitReason::StopLoss,
                ..
            }))
        ));
    }

    #[test]
    fn rule_exit_uses_close() {
        let strategy = Strategy::default();
        let mut state = entered_state(&strategy);

        let candles = make_candles(&[100.0, 101.0]);
        let signal = evaluate(&strategy, &mut state, &candles, &rsi_set(65.0, 72.0));
        let Some(Signal::Exit(exit)) = signal else {
            panic!("expected exit signal");
        };
        assert_eq!(exit.exit_price, 101.0);
        assert_eq!(exit.profit, 1.0);
        assert_eq!(exit.profit_percent, 1.0);
        assert_eq!(exit.rule, "RSI Overbought");
        assert_eq!(exit.reason, ExitReason::Rule);
        assert!(!state.in_position());
        assert!(state.last_signal.is_none());
    }

    #[test]
    fn first_enabled_rule_in_order_wins() {
        let mut strategy = Strategy::default();
        strategy.entry_rules = vec![
            RuleDefinition::stock(RuleKind::BollingerLowerTouch).enabled(true),
            RuleDefinition::stock(RuleKind::RsiOversold)
                .with_threshold(30.0)
                .enabled(true),
        ];
        let indicators = IndicatorSet {
            rsi: vec![35.0, 28.0],
            bollinger: BollingerBands {
                upper: vec![110.0],
                middle: vec![105.0],
                lower: vec![100.0],
            },
            ..Default::default()
        };
        let mut state = PositionState::default();
        let candles = make_candles(&[101.0, 100.0]);
        let signal = evaluate(&strategy, &mut state, &candles, &indicators);
        assert_eq!(signal.map(|s| s.rule().to_string()).as_deref(), Some("Lower Band Touch"));
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let mut strategy = Strategy::default();
        strategy.entry_rules[0].enabled = false;
        let mut state = PositionState::default();
        let candles = make_candles(&[101.0, 100.0]);
        assert!(evaluate(&strategy, &mut state, &candles, &rsi_set(35.0, 28.0)).is_none());
    }

    #[test]
    fn rule_without_threshold_is_skipped_but_others_run() {
        let mut strategy = Strategy::default();
        strategy.entry_rules[0].threshold = None;
        strategy.entry_rules[2].enabled = true; // bb-lower-touch
        let indicators = IndicatorSet {
            rsi: vec![35.0, 28.0],
            bollinger: BollingerBands {
                upper: vec![110.0],
                middle: vec![105.0],
                lower: vec![100.0],
            },
            ..Default::default()
        };
        let mut state = PositionState::default();
        let candles = make_candles(&[101.0, 100.0]);
        let signal = evaluate(&strategy, &mut state, &candles, &indicators);
        assert_eq!(signal.map(|s| s.rule().to_string()).as_deref(), Some("Lower Band Touch"));
    }

    #[test]
    fn atr_stop_from_latest_atr() {
        let mut strategy = Strategy::default();
        strategy.stop_loss = StopLossConfig {
            enabled: true,
            mode: StopLossMode::Atr { multiplier: 2.0 },
        };
        let indicators = IndicatorSet {
            rsi: vec![35.0, 28.0],
            atr: vec![3.0, 1.5],
            ..Default::default()
        };
        let mut state = PositionState::default();
        let candles = make_candles(&[101.0, 100.0]);
        evaluate(&strategy, &mut state, &candles, &indicators);
        assert_eq!(state.stop_loss(), Some(97.0));
        assert_eq!(state.take_profit(), Some(103.0));
    }

    #[test]
    fn disabled_bracket_never_exits() {
        let mut strategy = Strategy::default();
        strategy.stop_loss.enabled = false;
        strategy.take_profit = TakeProfitConfig {
            enabled: false,
            ..Default::default()
        };
        let mut state = entered_state(&strategy);
        assert_eq!(state.stop_loss(), None);
        assert_eq!(state.take_profit(), None);

        let mut candles = make_candles(&[100.0, 100.0]);
        candles[1].low = 50.0;
        candles[1].high = 150.0;
        assert!(evaluate(&strategy, &mut state, &candles, &rsi_set(50.0, 55.0)).is_none());
        assert!(state.in_position());
    }
}

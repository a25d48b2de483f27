//! Signal records emitted by the state machine.

use chrono::{DateTime, Utc};

pub const STOP_LOSS_RULE: &str = "Stop Loss";
pub const TAKE_PROFIT_RULE: &str = "Take Profit";

#[derive(Debug, Clone, PartialEq)]
pub struct EntrySignal {
    pub price: f64,
    pub time: DateTime<Utc>,
    pub rule_id: String,
    pub rule: String,
    pub description: String,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExitSignal {
    pub entry_price: f64,
    pub exit_price: f64,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub profit: f64,
    pub profit_percent: f64,
    pub rule: String,
    pub reason: ExitReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    Rule,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Entry(EntrySignal),
    Exit(ExitSignal),
}

impl Signal {
    pub fn is_entry(&self) -> bool {
        matches!(self, Signal::Entry(_))
    }

    /// Price at which the signal executes.
    pub fn price(&self) -> f64 {
        match self {
            Signal::Entry(e) => e.price,
            Signal::Exit(e) => e.exit_price,
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        match self {
            Signal::Entry(e) => e.time,
            Signal::Exit(e) => e.exit_time,
        }
    }

    pub fn rule(&self) -> &str {
        match self {
            Signal::Entry(e) => &e.rule,
            Signal::Exit(e) => &e.rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn signal_accessors() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 15, 0).unwrap();

        let entry = Signal::Entry(EntrySignal {
            price: 100.0,
            time: t0,
            rule_id: "rsi-oversold".into(),
            rule: "RSI Oversold".into(),
            description: String::new(),
            stop_loss: Some(98.0),
            take_profit: Some(103.0),
        });
        assert!(entry.is_entry());
        assert_eq!(entry.price(), 100.0);
        assert_eq!(entry.time(), t0);
        assert_eq!(entry.rule(), "RSI Oversold");

        let exit = Signal::Exit(ExitSignal {
            entry_price: 100.0,
            exit_price: 103.0,
            entry_time: t0,
            exit_time: t1,
            profit: 3.0,
            profit_percent: 3.0,
            rule: TAKE_PROFIT_RULE.into(),
            reason: ExitReason::TakeProfit,
        });
        assert!(!exit.is_entry());
        assert_eq!(exit.price(), 103.0);
        assert_eq!(exit.time(), t1);
        assert_eq!(exit.rule(), "Take Profit");
    }
}

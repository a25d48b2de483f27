//! Alert sinks: console lines and an in-memory recent-alerts panel.

use crate::domain::settings::NotificationSettings;
use crate::domain::signal::Signal;
use crate::ports::alert_sink::AlertSink;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::io::{self, Write};
use tracing::warn;

pub const RECENT_ALERTS_CAPACITY: usize = 10;

/// Sub-unit prices get four decimals.
pub fn format_price(price: f64) -> String {
    if price.abs() < 1.0 {
        format!("{:.4}", price)
    } else {
        format!("{:.2}", price)
    }
}

/// `BUY: SYM @ 100.00 [rule]` or `SELL: SYM @ 103.00 [rule] +3.00 (3.00%)`.
pub fn format_alert(symbol: &str, signal: &Signal) -> String {
    match signal {
        Signal::Entry(entry) => format!(
            "BUY: {} @ {} [{}]",
            symbol,
            format_price(entry.price),
            entry.rule
        ),
        Signal::Exit(exit) => format!(
            "SELL: {} @ {} [{}] {:+.2} ({:.2}%)",
            symbol,
            format_price(exit.exit_price),
            exit.rule,
            exit.profit,
            exit.profit_percent
        ),
    }
}

/// Writes one line per alert, honouring the entry/exit notification flags.
pub struct ConsoleAlertSink<W: Write> {
    out: W,
    notifications: NotificationSettings,
}

impl ConsoleAlertSink<io::Stdout> {
    pub fn stdout(notifications: NotificationSettings) -> Self {
        Self::new(io::stdout(), notifications)
    }
}

impl<W: Write> ConsoleAlertSink<W> {
    pub fn new(out: W, notifications: NotificationSettings) -> Self {
        Self { out, notifications }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AlertSink for ConsoleAlertSink<W> {
    fn send(&mut self, symbol: &str, signal: &Signal) {
        let wanted = match signal {
            Signal::Entry(_) => self.notifications.notify_entry,
            Signal::Exit(_) => self.notifications.notify_exit,
        };
        if !wanted {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", format_alert(symbol, signal)) {
            warn!(symbol, error = %e, "failed to write alert");
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub symbol: String,
    pub time: DateTime<Utc>,
    pub signal: Signal,
}

/// The most recent alerts, newest first.
#[derive(Debug, Clone)]
pub struct RecentAlerts {
    alerts: VecDeque<Alert>,
    capacity: usize,
}

impl Default for RecentAlerts {
    fn default() -> Self {
        Self::with_capacity(RECENT_ALERTS_CAPACITY)
    }
}

impl RecentAlerts {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            alerts: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

impl AlertSink for RecentAlerts {
    fn send(&mut self, symbol: &str, signal: &Signal) {
        self.alerts.push_front(Alert {
            symbol: symbol.to_string(),
            time: signal.time(),
            signal: signal.clone(),
        });
        self.alerts.truncate(self.capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::{EntrySignal, ExitReason, ExitSignal};
    use chrono::{Duration, TimeZone};

    fn t(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 14, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn entry(price: f64, minutes: i64) -> Signal {
        Signal::Entry(EntrySignal {
            price,
            time: t(minutes),
            rule_id: "rsi-oversold".into(),
            rule: "RSI Oversold".into(),
            description: String::new(),
            stop_loss: Some(price * 0.98),
            take_profit: Some(price * 1.03),
        })
    }

    fn exit(exit_price: f64, profit: f64, profit_percent: f64) -> Signal {
        Signal::Exit(ExitSignal {
            entry_price: 100.0,
            exit_price,
            entry_time: t(0),
            exit_time: t(30),
            profit,
            profit_percent,
            rule: "Take Profit".into(),
            reason: ExitReason::TakeProfit,
        })
    }

    #[test]
    fn format_buy_line() {
        assert_eq!(
            format_alert("AAPL", &entry(100.0, 0)),
            "BUY: AAPL @ 100.00 [RSI Oversold]"
        );
    }

    #[test]
    fn format_sell_line() {
        assert_eq!(
            format_alert("AAPL", &exit(103.0, 3.0, 3.0)),
            "SELL: AAPL @ 103.00 [Take Profit] +3.00 (3.00%)"
        );
        assert_eq!(
            format_alert("AAPL", &exit(98.0, -2.0, -2.0)),
            "SELL: AAPL @ 98.00 [Take Profit] -2.00 (-2.00%)"
        );
    }

    #[test]
    fn format_small_prices() {
        assert_eq!(format_price(0.12345), "0.1235");
        assert_eq!(format_price(12.346), "12.35");
    }

    #[test]
    fn console_sink_writes_lines() {
        let mut sink = ConsoleAlertSink::new(Vec::new(), NotificationSettings::default());
        sink.send("MSFT", &entry(100.0, 0));
        sink.send("MSFT", &exit(103.0, 3.0, 3.0));
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            output,
            "BUY: MSFT @ 100.00 [RSI Oversold]\nSELL: MSFT @ 103.00 [Take Profit] +3.00 (3.00%)\n"
        );
    }

    #[test]
    fn console_sink_honours_flags() {
        let notifications = NotificationSettings {
            notify_entry: false,
            notify_exit: true,
        };
        let mut sink = ConsoleAlertSink::new(Vec::new(), notifications);
        sink.send("MSFT", &entry(100.0, 0));
        sink.send("MSFT", &exit(103.0, 3.0, 3.0));
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.starts_with("SELL:"));
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn recent_alerts_keeps_newest_ten() {
        let mut recent = RecentAlerts::default();
        for i in 0..12 {
            recent.send("AAPL", &entry(100.0 + i as f64, i));
        }
        assert_eq!(recent.len(), 10);
        let prices: Vec<f64> = recent.iter().map(|a| a.signal.price()).collect();
        assert_eq!(prices[0], 111.0);
        assert_eq!(prices[9], 102.0);
        assert_eq!(recent.iter().next().map(|a| a.time), Some(t(11)));
    }
}

//! Period-by-period replay of a candle history.
//!
//! Each step hands the state machine the trailing `window` candles ending at
//! that period, with indicators recomputed from scratch over the window, the
//! same way a live refresh would.

use crate::domain::candle::Candle;
use crate::domain::indicator_set::compute_indicators;
use crate::domain::metrics::TradeStats;
use crate::domain::settings::IndicatorSettings;
use crate::domain::signal::{ExitSignal, Signal};
use crate::domain::signal_engine::MIN_CANDLES;
use crate::domain::watchlist::Watchlist;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub symbol: String,
    pub periods: usize,
    pub signals: Vec<Signal>,
    pub trades: Vec<ExitSignal>,
    pub open_entry: Option<f64>,
}

impl ReplaySummary {
    pub fn stats(&self) -> TradeStats {
        TradeStats::compute(&self.trades)
    }
}

pub fn replay<F>(
    watchlist: &mut Watchlist,
    symbol: &str,
    candles: &[Candle],
    indicators: &IndicatorSettings,
    window: usize,
    mut on_signal: F,
) -> ReplaySummary
where
    F: FnMut(&Signal),
{
    let window = window.max(MIN_CANDLES);
    let mut signals = Vec::new();
    let mut trades = Vec::new();
    let mut periods = 0;

    for end in MIN_CANDLES..=candles.len() {
        let start = end.saturating_sub(window);
        let slice = &candles[start..end];
        let set = compute_indicators(slice, indicators);
        periods += 1;

        if let Some(signal) = watchlist.evaluate(symbol, slice, &set) {
            debug!(symbol, period = end - 1, entry = signal.is_entry(), "signal");
            on_signal(&signal);
            if let Signal::Exit(exit) = &signal {
                trades.push(exit.clone());
            }
            signals.push(signal);
        }
    }

    ReplaySummary {
        symbol: symbol.to_string(),
        periods,
        signals,
        trades,
        open_entry: watchlist.state(symbol).and_then(|s| s.entry_price()),
    }
}

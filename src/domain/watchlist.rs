//! Per-symbol position states.

use crate::domain::candle::Candle;
use crate::domain::indicator_set::IndicatorSet;
use crate::domain::position::PositionState;
use crate::domain::signal::Signal;
use crate::domain::signal_engine;
use crate::domain::strategy::Strategy;
use std::collections::BTreeMap;

/// One strategy applied to many symbols, each with its own position state.
#[derive(Debug, Clone)]
pub struct Watchlist {
    strategy: Strategy,
    states: BTreeMap<String, PositionState>,
}

impl Watchlist {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            states: BTreeMap::new(),
        }
    }

    /// Evaluate `symbol`'s latest window against its own state, creating a
    /// flat state on first use.
    pub fn evaluate(
        &mut self,
        symbol: &str,
        candles: &[Candle],
        indicators: &IndicatorSet,
    ) -> Option<Signal> {
        let state = self.states.entry(symbol.to_string()).or_default();
        signal_engine::evaluate(&self.strategy, state, candles, indicators)
    }

    pub fn state(&self, symbol: &str) -> Option<&PositionState> {
        self.states.get(symbol)
    }
}

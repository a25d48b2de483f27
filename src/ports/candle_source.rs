//! Market data port trait.

use crate::domain::candle::Candle;
use crate::domain::error::CandlewatchError;

pub trait CandleSource {
    /// All candles for `symbol`, ascending by timestamp.
    fn fetch_candles(&self, symbol: &str) -> Result<Vec<Candle>, CandlewatchError>;

    fn list_symbols(&self) -> Result<Vec<String>, CandlewatchError>;
}

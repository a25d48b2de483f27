//! Port traits implemented by the adapters.

pub mod alert_sink;
pub mod candle_source;
pub mod config_port;

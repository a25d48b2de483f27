//! Core domain types and logic.

pub mod candle;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod indicator_set;
pub mod metrics;
pub mod position;
pub mod replay;
pub mod rule;
pub mod rule_eval;
pub mod settings;
pub mod signal;
pub mod signal_engine;
pub mod strategy;
pub mod watchlist;

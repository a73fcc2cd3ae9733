//! Core domain types and logic.

pub mod ohlcv;
pub mod session;
pub mod price_lookup;
pub mod momentum;
pub mod indicator;
pub mod crossover;
pub mod metrics;
pub mod error;
pub mod config_validation;

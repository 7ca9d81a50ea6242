// Feature engineering
pub mod market_data;

// Estimators, persistence layout and bootstrap
pub mod ml;

// Walk-forward backtesting
pub mod optimization;

// Per-feature attribution
pub mod explain;

pub mod forecast;
pub mod pipeline;

// Price history
pub mod market;

// Feature schema and datasets
pub mod ml;

// Return statistics and risk metrics
pub mod performance;

// Backtest summary record
pub mod backtest;

// Attribution results
pub mod attribution;

// Domain-specific error types
pub mod errors;

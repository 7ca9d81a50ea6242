// Strategy backtesting
pub mod walk_forward;

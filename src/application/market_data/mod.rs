// Market data processing modules
pub mod feature_pipeline;

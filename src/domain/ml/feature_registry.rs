/// Ordered list of feature names.
/// Persisted models record this list and are rejected on load if it differs,
/// so any change here is a breaking change for saved models.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["ret1", "vol", "rsi", "sentiment"];

pub const FEATURE_COUNT: usize = 4;

/// One row of the feature matrix, in `FEATURE_NAMES` order.
pub type FeatureVector = [f64; FEATURE_COUNT];

pub const RET1: usize = 0;
pub const VOL: usize = 1;
pub const RSI: usize = 2;
pub const SENTIMENT: usize = 3;

/// Fill value used when a feature is undefined or non-finite.
pub fn default_value(index: usize, rsi_neutral: f64) -> f64 {
    if index == RSI { rsi_neutral } else { 0.0 }
}

pub fn feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order() {
        assert_eq!(FEATURE_NAMES[RET1], "ret1");
        assert_eq!(FEATURE_NAMES[VOL], "vol");
        assert_eq!(FEATURE_NAMES[RSI], "rsi");
        assert_eq!(FEATURE_NAMES[SENTIMENT], "sentiment");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(default_value(RSI, 50.0), 50.0);
        assert_eq!(default_value(RET1, 50.0), 0.0);
        assert_eq!(default_value(SENTIMENT, 50.0), 0.0);
    }
}

use statrs::statistics::Statistics;

/// Shared statistics utilities for return series.
///
/// Standard deviations are population (ddof = 0) throughout so that feature
/// volatility and the Sharpe denominator use the same convention.
pub struct Stats;

impl Stats {
    /// Arithmetic mean; 0.0 for an empty slice.
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().mean()
    }

    /// Population standard deviation; 0.0 for an empty slice.
    pub fn std_dev(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().population_std_dev()
    }

    /// Trailing-window population std. `None` until `window` values exist.
    pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
        Self::rolling(values, window, Self::std_dev)
    }

    /// Trailing-window mean. `None` until `window` values exist.
    pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
        Self::rolling(values, window, Self::mean)
    }

    fn rolling(values: &[f64], window: usize, f: fn(&[f64]) -> f64) -> Vec<Option<f64>> {
        (0..values.len())
            .map(|i| {
                if window == 0 || i + 1 < window {
                    None
                } else {
                    Some(f(&values[i + 1 - window..=i]))
                }
            })
            .collect()
    }

    /// Simple close-to-close returns. A zero previous price yields 0.0.
    pub fn calculate_returns(prices: &[f64]) -> Vec<f64> {
        prices
            .windows(2)
            .map(|w| if w[0] > 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
            .collect()
    }
}

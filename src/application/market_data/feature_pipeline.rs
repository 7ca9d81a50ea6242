//! Price series → aligned feature matrix and forward-return labels.
//!
//! Features, in `FEATURE_NAMES` order:
//! - `ret1`: one-period simple return
//! - `vol`: rolling std of `ret1`
//! - `rsi`: Relative Strength Index with exponentially weighted averages
//! - `sentiment`: rolling z-score of `ret1`, a proxy for news sentiment
//!
//! The label for row `t` is `ret1[t + 1]`. No feature at `t` reads anything
//! after `t`, and the final bar (which has no label) is excluded from X and y.

use crate::config::FeatureConfig;
use crate::domain::market::price_series::PriceSeries;
use crate::domain::ml::dataset::Dataset;
use crate::domain::ml::feature_registry::{FEATURE_COUNT, FeatureVector, default_value};
use crate::domain::performance::stats::Stats;
use tracing::debug;

/// Builds `(X, y)` from a validated price series.
///
/// Fewer than two bars produce an empty dataset; that is a valid result, not
/// an error.
pub fn build_dataset(series: &PriceSeries, config: &FeatureConfig) -> Dataset {
    let n = series.len();
    if n == 0 {
        return Dataset::default();
    }

    let closes = series.closes();
    let timestamps = series.timestamps();

    let ret1 = one_period_returns(&closes);
    let vol = Stats::rolling_std(&ret1, config.vol_window);
    let rsi = calculate_rsi(&closes, config.rsi_period, config.epsilon);
    let sentiment = rolling_zscore(&ret1, config.sentiment_window, config.epsilon);

    let rows: Vec<FeatureVector> = (0..n)
        .map(|t| {
            let raw = [Some(ret1[t]), vol[t], rsi[t], sentiment[t]];
            let mut row = [0.0; FEATURE_COUNT];
            for (i, value) in raw.into_iter().enumerate() {
                row[i] = match value {
                    Some(v) if v.is_finite() => v,
                    _ => default_value(i, config.rsi_neutral),
                };
            }
            row
        })
        .collect();

    let labeled = n - 1;
    let dataset = Dataset {
        timestamps: timestamps[..labeled].to_vec(),
        features: rows[..labeled].to_vec(),
        labels: ret1[1..].to_vec(),
        pending: Some((timestamps[labeled], rows[labeled])),
    };

    debug!(
        "Built dataset: {} bars -> {} labeled rows",
        n,
        dataset.len()
    );
    dataset
}

/// `ret1`, with the undefined first value set to 0.0.
fn one_period_returns(closes: &[f64]) -> Vec<f64> {
    let mut ret1 = Vec::with_capacity(closes.len());
    if !closes.is_empty() {
        ret1.push(0.0);
        ret1.extend(Stats::calculate_returns(closes));
    }
    ret1
}

/// RSI over close-to-close deltas.
///
/// Gains and losses are smoothed with an adjusted exponentially weighted mean
/// (`alpha = 1 / period`, weights normalised by their running sum). The first
/// bar has no delta and yields `None`.
pub fn calculate_rsi(closes: &[f64], period: usize, epsilon: f64) -> Vec<Option<f64>> {
    let alpha = 1.0 / period.max(1) as f64;
    let decay = 1.0 - alpha;

    let mut out = Vec::with_capacity(closes.len());
    let mut gain_num = 0.0;
    let mut loss_num = 0.0;
    let mut weight = 0.0;

    for (t, close) in closes.iter().enumerate() {
        if t == 0 {
            out.push(None);
            continue;
        }
        let delta = close - closes[t - 1];
        gain_num = delta.max(0.0) + decay * gain_num;
        loss_num = (-delta).max(0.0) + decay * loss_num;
        weight = 1.0 + decay * weight;

        let avg_gain = gain_num / weight;
        let avg_loss = loss_num / weight;
        let rs = avg_gain / (avg_loss + epsilon);
        out.push(Some(100.0 - 100.0 / (1.0 + rs)));
    }
    out
}

/// `(x - rolling_mean) / (rolling_std + epsilon)` over a trailing window.
fn rolling_zscore(values: &[f64], window: usize, epsilon: f64) -> Vec<Option<f64>> {
    let means = Stats::rolling_mean(values, window);
    let stds = Stats::rolling_std(values, window);
    values
        .iter()
        .zip(means.iter().zip(stds.iter()))
        .map(|(x, (m, s))| match (m, s) {
            (Some(m), Some(s)) => Some((x - m) / (s + epsilon)),
            _ => None,
        })
        .collect()
}

use rustcast::application::market_data::feature_pipeline::build_dataset;
use rustcast::config::FeatureConfig;
use rustcast::domain::market::price_series::PriceSeries;
use rustcast::domain::ml::feature_registry::{FEATURE_COUNT, RSI};

fn series(closes: &[f64]) -> PriceSeries {
    let points: Vec<(i64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, c)| (1_700_000_000 + i as i64 * 86_400, *c))
        .collect();
    PriceSeries::from_closes(&points).unwrap()
}

fn noisy(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 50.0 + (i as f64 * 1.3).sin() * 2.0 + (i as f64 * 0.31).cos())
        .collect()
}

#[test]
fn test_features_never_read_future_bars() {
    let closes = noisy(60);
    let cfg = FeatureConfig::default();
    let full = build_dataset(&series(&closes), &cfg);

    // The row for bar t must be identical whether or not later bars exist.
    for t in 1..closes.len() - 1 {
        let truncated = build_dataset(&series(&closes[..=t]), &cfg);
        let (_, pending) = truncated.pending.unwrap();
        assert_eq!(pending, full.features[t], "row {} changed", t);
    }
}

#[test]
fn test_shapes_and_finiteness() {
    let closes = noisy(45);
    let ds = build_dataset(&series(&closes), &FeatureConfig::default());

    assert_eq!(ds.len(), closes.len() - 1);
    assert_eq!(ds.labels.len(), ds.len());
    assert_eq!(ds.timestamps.len(), ds.len());
    for row in &ds.features {
        assert_eq!(row.len(), FEATURE_COUNT);
        assert!(row.iter().all(|v| v.is_finite()));
        assert!((0.0..=100.0).contains(&row[RSI]));
    }
    assert!(ds.labels.iter().all(|v| v.is_finite()));
}

#[test]
fn test_label_is_following_return() {
    let closes = [10.0, 11.0, 9.9, 12.0];
    let ds = build_dataset(&series(&closes), &FeatureConfig::default());
    let expected = [0.1, -0.1, 12.0 / 9.9 - 1.0];
    for (label, want) in ds.labels.iter().zip(expected) {
        assert!((label - want).abs() < 1e-12);
    }
}

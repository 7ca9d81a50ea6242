use rustcast::application::optimization::walk_forward::WalkForwardEvaluator;
use rustcast::application::pipeline::backtest_series;
use rustcast::config::Config;
use rustcast::domain::backtest::BacktestResult;
use rustcast::domain::market::price_series::PriceSeries;
use rustcast::domain::ml::feature_registry::FeatureVector;

fn rows(n: usize) -> (Vec<FeatureVector>, Vec<f64>) {
    let x: Vec<FeatureVector> = (0..n)
        .map(|i| {
            let t = i as f64;
            [
                (t * 0.9).sin() * 0.01,
                0.01 + t * 1e-4,
                50.0 + (t * 0.4).cos() * 10.0,
                (t * 0.2).sin(),
            ]
        })
        .collect();
    let y: Vec<f64> = x.iter().map(|r| 0.5 * r[0] + 0.001).collect();
    (x, y)
}

#[test]
fn test_samples_equal_total_test_rows() {
    let (x, y) = rows(29);
    let report = WalkForwardEvaluator::with_splits(5).evaluate_detailed(&x, &y);

    let test_rows: usize = report.folds.iter().map(|f| f.test.len()).sum();
    assert_eq!(report.result.samples(), test_rows);
    assert_eq!(test_rows, 20);
    assert_eq!(report.out_of_sample.len(), 20);
    assert_eq!(report.strategy_returns.len(), 20);
}

#[test]
fn test_training_never_sees_later_rows() {
    let (x, y) = rows(40);
    let evaluator = WalkForwardEvaluator::with_splits(4);
    let baseline = evaluator.evaluate_detailed(&x, &y);

    // Perturbing the last fold's rows must leave every earlier prediction unchanged.
    let last_test = baseline.folds.last().unwrap().test.clone();
    let mut x2 = x.clone();
    let mut y2 = y.clone();
    for row in last_test.clone() {
        x2[row] = [1.0, 1.0, 99.0, 5.0];
        y2[row] = 0.5;
    }
    let perturbed = evaluator.evaluate_detailed(&x2, &y2);

    for (a, b) in baseline.out_of_sample.iter().zip(&perturbed.out_of_sample) {
        if a.row < last_test.start {
            assert_eq!(a.prediction, b.prediction, "row {} leaked", a.row);
        }
    }
}

#[test]
fn test_end_to_end_on_linear_uptrend() {
    let points: Vec<(i64, f64)> = (0..30)
        .map(|i| (i as i64 * 86_400, 100.0 + 30.0 * i as f64 / 29.0))
        .collect();
    let series = PriceSeries::from_closes(&points).unwrap();

    match backtest_series(&series, &Config::default()) {
        BacktestResult::Completed {
            samples,
            mse,
            cagr,
            sharpe,
            max_drawdown,
        } => {
            assert_eq!(samples, 20);
            assert!(mse >= 0.0);
            assert!(max_drawdown <= 0.0);
            assert!(cagr.is_finite());
            assert!(sharpe.is_finite());
        }
        other => panic!("expected a completed backtest, got {:?}", other),
    }
}

#[test]
fn test_result_serializes_flat() {
    let (x, y) = rows(12);
    let evaluator = WalkForwardEvaluator::with_splits(5);
    let value = serde_json::to_value(evaluator.evaluate(&x, &y)).unwrap();
    for key in ["samples", "mse", "cagr", "sharpe", "max_drawdown"] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }

    let short = serde_json::to_value(evaluator.evaluate(&x[..3], &y[..3])).unwrap();
    assert_eq!(short["samples"], 3);
    assert!(short["error"].is_string());
}

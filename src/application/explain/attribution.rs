//! Best-effort per-feature attribution with a fixed fallback order:
//!
//! 1. Exact interventional Shapley values computed from the model's
//!    predictions over a bounded background sample
//! 2. Absolute linear coefficients (`Linear` models)
//! 3. Absolute feature importances (`TreeEnsemble` models)
//!
//! The first strategy that succeeds wins; results are never merged.

use crate::application::ml::model::{Estimator, Model};
use crate::config::AttributionConfig;
use crate::domain::attribution::{Attribution, AttributionMethod};
use crate::domain::errors::AttributionFailure;
use crate::domain::ml::feature_registry::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
use tracing::{debug, warn};

pub struct AttributionExplainer {
    config: AttributionConfig,
}

impl Default for AttributionExplainer {
    fn default() -> Self {
        Self::new(AttributionConfig::default())
    }
}

impl AttributionExplainer {
    pub fn new(config: AttributionConfig) -> Self {
        Self { config }
    }

    /// Attribution for `target`, using at most `max_background_rows` of the
    /// most recent `background` rows.
    pub fn explain(
        &self,
        model: &Model,
        background: &[FeatureVector],
        target: &FeatureVector,
    ) -> Attribution {
        let primary = match self.perturbation(model, background, target) {
            Ok(values) => {
                return Attribution::Explained {
                    method: AttributionMethod::Perturbation,
                    values: named(&values),
                };
            }
            Err(reason) => reason,
        };
        debug!("Perturbation attribution unavailable: {}", primary);

        let fallback = match &model.estimator {
            Estimator::Linear(m) => Some((AttributionMethod::Coefficients, &m.coefficients)),
            Estimator::TreeEnsemble(m) => {
                Some((AttributionMethod::FeatureImportances, &m.importances))
            }
            Estimator::Opaque(_) => None,
        };

        let Some((method, raw)) = fallback else {
            warn!("No attribution available: {}", primary);
            return Attribution::Unavailable(AttributionFailure::NoFallback { primary });
        };

        match absolute_values(raw) {
            Ok(values) => Attribution::Explained {
                method,
                values: named(&values),
            },
            Err(fallback) => {
                warn!("Attribution fallback failed: {}", fallback);
                Attribution::Unavailable(AttributionFailure::FallbackFailed { primary, fallback })
            }
        }
    }

    fn perturbation(
        &self,
        model: &Model,
        background: &[FeatureVector],
        target: &FeatureVector,
    ) -> Result<Vec<f64>, String> {
        if !self.config.perturbation_enabled {
            return Err("perturbation attribution disabled".to_string());
        }
        let start = background
            .len()
            .saturating_sub(self.config.max_background_rows);
        let values = shapley_values(model, &background[start..], target)?;
        Ok(values.iter().map(|v| v.abs()).collect())
    }
}

/// Exact Shapley values of `target` relative to `background`.
///
/// The value of a coalition S is the mean prediction over background rows
/// with the features in S replaced by the target's. The values sum to
/// `f(target) - mean(f(background))`.
pub fn shapley_values(
    model: &Model,
    background: &[FeatureVector],
    target: &FeatureVector,
) -> Result<Vec<f64>, String> {
    if background.is_empty() {
        return Err("empty background sample".to_string());
    }

    let coalitions = 1usize << FEATURE_COUNT;
    let mut batch = Vec::with_capacity(coalitions * background.len());
    for mask in 0..coalitions {
        for row in background {
            let mut z = *row;
            for (j, value) in z.iter_mut().enumerate() {
                if mask & (1 << j) != 0 {
                    *value = target[j];
                }
            }
            batch.push(z);
        }
    }

    let predictions = model.predict(&batch).map_err(|e| e.to_string())?;
    if predictions.len() != batch.len() {
        return Err(format!(
            "model returned {} predictions for {} rows",
            predictions.len(),
            batch.len()
        ));
    }

    let coalition_value: Vec<f64> = predictions
        .chunks(background.len())
        .map(|chunk| chunk.iter().sum::<f64>() / chunk.len() as f64)
        .collect();

    let weights: Vec<f64> = (0..FEATURE_COUNT)
        .map(|size| {
            factorial(size) * factorial(FEATURE_COUNT - size - 1) / factorial(FEATURE_COUNT)
        })
        .collect();

    let mut phi = vec![0.0; FEATURE_COUNT];
    for (j, value) in phi.iter_mut().enumerate() {
        let bit = 1 << j;
        for mask in (0..coalitions).filter(|m| m & bit == 0) {
            let size = mask.count_ones() as usize;
            *value += weights[size] * (coalition_value[mask | bit] - coalition_value[mask]);
        }
    }

    if let Some(j) = phi.iter().position(|v| !v.is_finite()) {
        return Err(format!("non-finite attribution for {}", FEATURE_NAMES[j]));
    }
    Ok(phi)
}

fn absolute_values(raw: &[f64]) -> Result<Vec<f64>, String> {
    if raw.len() != FEATURE_COUNT {
        return Err(format!(
            "expected {} values, model has {}",
            FEATURE_COUNT,
            raw.len()
        ));
    }
    if let Some(j) = raw.iter().position(|v| !v.is_finite()) {
        return Err(format!("non-finite importance for {}", FEATURE_NAMES[j]));
    }
    Ok(raw.iter().map(|v| v.abs()).collect())
}

fn named(values: &[f64]) -> Vec<(String, f64)> {
    FEATURE_NAMES
        .iter()
        .zip(values)
        .map(|(name, v)| (name.to_string(), *v))
        .collect()
}

fn factorial(n: usize) -> f64 {
    (1..=n).map(|k| k as f64).product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::linear::LinearModel;
    use crate::application::ml::model::MeanModel;

    fn linear(coefficients: Vec<f64>) -> Model {
        Model::new(Estimator::Linear(LinearModel {
            coefficients,
            intercept: 0.001,
            alpha: 1.0,
        }))
    }

    fn background() -> Vec<FeatureVector> {
        (0..10)
            .map(|i| {
                let t = i as f64;
                [t * 0.001, 0.01, 40.0 + t, (t * 0.5).sin()]
            })
            .collect()
    }

    #[test]
    fn test_linear_shapley_matches_closed_form() {
        let coef = vec![2.0, -1.0, 0.01, 0.5];
        let model = linear(coef.clone());
        let bg = background();
        let target = [0.02, 0.03, 70.0, 1.0];

        let phi = shapley_values(&model, &bg, &target).unwrap();
        for j in 0..FEATURE_COUNT {
            let mean_j = bg.iter().map(|r| r[j]).sum::<f64>() / bg.len() as f64;
            let expected = coef[j] * (target[j] - mean_j);
            assert!((phi[j] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_primary_wins_when_enabled() {
        let model = linear(vec![2.0, -1.0, 0.01, 0.5]);
        let attribution =
            AttributionExplainer::default().explain(&model, &background(), &[0.0, 0.0, 50.0, 0.0]);
        assert_eq!(attribution.method(), Some(AttributionMethod::Perturbation));
        assert!(attribution.value("rsi").unwrap() >= 0.0);
    }

    #[test]
    fn test_coefficient_fallback_when_disabled() {
        let model = linear(vec![2.0, -1.0, 0.01, -0.5]);
        let explainer = AttributionExplainer::new(AttributionConfig {
            perturbation_enabled: false,
            ..AttributionConfig::default()
        });
        let attribution = explainer.explain(&model, &background(), &[0.0; 4]);
        assert_eq!(attribution.method(), Some(AttributionMethod::Coefficients));
        assert_eq!(attribution.value("vol"), Some(1.0));
        assert_eq!(attribution.value("sentiment"), Some(0.5));
    }

    #[test]
    fn test_opaque_without_background_has_no_fallback() {
        let model = Model::new(Estimator::Opaque(MeanModel { mean: 0.0 }));
        let attribution = AttributionExplainer::default().explain(&model, &[], &[0.0; 4]);
        assert!(!attribution.is_ok());
        match attribution {
            Attribution::Unavailable(AttributionFailure::NoFallback { primary }) => {
                assert!(primary.contains("empty background"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bad_coefficients_report_fallback_failure() {
        let model = linear(vec![f64::NAN, 1.0, 1.0, 1.0]);
        let attribution = AttributionExplainer::default().explain(&model, &[], &[0.0; 4]);
        match attribution {
            Attribution::Unavailable(AttributionFailure::FallbackFailed { fallback, .. }) => {
                assert!(fallback.contains("ret1"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_background_is_bounded_to_recent_rows() {
        let model = linear(vec![1.0, 0.0, 0.0, 0.0]);
        let mut bg = vec![[100.0, 0.0, 50.0, 0.0]; 5];
        bg.extend(vec![[0.0, 0.0, 50.0, 0.0]; 3]);
        let explainer = AttributionExplainer::new(AttributionConfig {
            perturbation_enabled: true,
            max_background_rows: 3,
        });
        let attribution = explainer.explain(&model, &bg, &[1.0, 0.0, 50.0, 0.0]);
        // Only the trailing zero rows count: |1.0 * (1.0 - 0.0)|
        assert!((attribution.value("ret1").unwrap() - 1.0).abs() < 1e-12);
    }
}

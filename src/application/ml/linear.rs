//! Closed-form ridge regression.
//!
//! The intercept is left unpenalised by centering X and y before solving
//! `(XcᵀXc + αI) w = Xcᵀyc`. With α > 0 the system is positive definite, so
//! the Cholesky solve always succeeds on finite input.

use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::{FEATURE_COUNT, FeatureVector};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub alpha: f64,
}

impl LinearModel {
    pub fn fit(x: &[FeatureVector], y: &[f64], alpha: f64) -> Result<Self, ModelError> {
        let n = x.len();
        let design = Array2::from_shape_fn((n, FEATURE_COUNT), |(i, j)| x[i][j]);
        let target = Array1::from_vec(y.to_vec());

        let x_mean = design
            .mean_axis(Axis(0))
            .ok_or(ModelError::InsufficientData {
                required: 1,
                actual: 0,
            })?;
        let y_mean = target.mean().unwrap_or(0.0);

        let xc = &design - &x_mean;
        let yc = &target - y_mean;

        let mut gram = xc.t().dot(&xc);
        for i in 0..FEATURE_COUNT {
            gram[[i, i]] += alpha;
        }
        let rhs = xc.t().dot(&yc);

        let weights = cholesky_solve(&gram, &rhs)?;
        let intercept = y_mean - x_mean.dot(&weights);

        Ok(Self {
            coefficients: weights.to_vec(),
            intercept,
            alpha,
        })
    }

    pub fn predict(&self, x: &[FeatureVector]) -> Vec<f64> {
        x.iter()
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(self.coefficients.iter())
                        .map(|(v, w)| v * w)
                        .sum::<f64>()
            })
            .collect()
    }
}

/// Solves `a · w = b` for symmetric positive-definite `a`.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, ModelError> {
    let p = a.nrows();
    let mut l = Array2::<f64>::zeros((p, p));

    for i in 0..p {
        for j in 0..=i {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            if i == j {
                if !(sum.is_finite() && sum > 0.0) {
                    return Err(ModelError::Solver(format!(
                        "matrix is not positive definite (pivot {} = {})",
                        i, sum
                    )));
                }
                l[[i, i]] = sum.sqrt();
            } else {
                l[[i, j]] = sum / l[[j, j]];
            }
        }
    }

    // L z = b
    let mut z = Array1::<f64>::zeros(p);
    for i in 0..p {
        let mut s = b[i];
        for k in 0..i {
            s -= l[[i, k]] * z[k];
        }
        z[i] = s / l[[i, i]];
    }

    // Lᵀ w = z
    let mut w = Array1::<f64>::zeros(p);
    for i in (0..p).rev() {
        let mut s = z[i];
        for k in (i + 1)..p {
            s -= l[[k, i]] * w[k];
        }
        w[i] = s / l[[i, i]];
    }
    Ok(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data(n: usize) -> (Vec<FeatureVector>, Vec<f64>) {
        let x: Vec<FeatureVector> = (0..n)
            .map(|i| {
                let t = i as f64;
                [t.sin(), (t * 0.3).cos(), t * 0.1, (t * 1.7).sin()]
            })
            .collect();
        let y = x
            .iter()
            .map(|r| 0.5 + 2.0 * r[0] - 1.0 * r[1] + 0.3 * r[2] + 0.0 * r[3])
            .collect();
        (x, y)
    }

    #[test]
    fn test_small_alpha_recovers_coefficients() {
        let (x, y) = linear_data(200);
        let model = LinearModel::fit(&x, &y, 1e-8).unwrap();
        let expected = [2.0, -1.0, 0.3, 0.0];
        for (c, e) in model.coefficients.iter().zip(expected) {
            assert!((c - e).abs() < 1e-4, "coef {} vs {}", c, e);
        }
        assert!((model.intercept - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_alpha_shrinks_coefficients() {
        let (x, y) = linear_data(50);
        let loose = LinearModel::fit(&x, &y, 1e-8).unwrap();
        let tight = LinearModel::fit(&x, &y, 100.0).unwrap();
        let norm = |m: &LinearModel| m.coefficients.iter().map(|c| c * c).sum::<f64>();
        assert!(norm(&tight) < norm(&loose));
    }

    #[test]
    fn test_single_row_predicts_its_label() {
        let model = LinearModel::fit(&[[0.1, 0.2, 50.0, 0.0]], &[0.03], 1.0).unwrap();
        assert!(model.coefficients.iter().all(|c| *c == 0.0));
        let pred = model.predict(&[[9.0, 9.0, 9.0, 9.0]]);
        assert!((pred[0] - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_constant_columns_are_solvable() {
        let x = vec![[0.0, 0.0, 50.0, 0.0]; 10];
        let y = vec![0.01; 10];
        let model = LinearModel::fit(&x, &y, 1.0).unwrap();
        assert!((model.predict(&x)[0] - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_zero_alpha_singular_is_solver_error() {
        let x = vec![[1.0, 1.0, 1.0, 1.0]; 5];
        let y = vec![0.0; 5];
        assert!(matches!(
            LinearModel::fit(&x, &y, 0.0),
            Err(ModelError::Solver(_))
        ));
    }
}

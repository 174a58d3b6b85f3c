use log::debug;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::{Sample, FEATURES, FEATURE_NAMES, TRAINING_SET};

/// Ordinary least-squares model `y = w . x + b`.
///
/// Fitting centres features and targets, solves the centred system for the
/// minimum-norm weights and recovers the intercept from the means, so the
/// intercept is never shrunk and collinear features share weight evenly.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    coefficients: [f64; FEATURES],
    intercept: f64,
    n_samples: usize,
    training_r2: f64,
}

impl LinearModel {
    pub fn fit(samples: &[Sample]) -> Result<Self, ModelError> {
        if samples.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if let Some(row) = samples
            .iter()
            .position(|(x, y)| !y.is_finite() || x.iter().any(|v| !v.is_finite()))
        {
            return Err(ModelError::NonFinite { row });
        }

        let n = samples.len();
        let x_mean: [f64; FEATURES] =
            std::array::from_fn(|j| samples.iter().map(|(x, _)| x[j]).sum::<f64>() / n as f64);
        let y_mean = samples.iter().map(|(_, y)| y).sum::<f64>() / n as f64;

        let design = DMatrix::from_fn(n, FEATURES, |i, j| samples[i].0[j] - x_mean[j]);
        let target = DVector::from_iterator(n, samples.iter().map(|(_, y)| y - y_mean));

        let weights = if design.iter().all(|v| *v == 0.0) {
            // No feature varies; the intercept alone fits.
            DVector::zeros(FEATURES)
        } else {
            let svd = design.svd(true, true);
            // Same relative cutoff LAPACK's gelsd uses by default.
            let cutoff = (svd.singular_values.max() * n.max(FEATURES) as f64 * f64::EPSILON)
                .max(f64::MIN_POSITIVE);
            svd.solve(&target, cutoff).map_err(ModelError::Solve)?
        };

        let coefficients: [f64; FEATURES] = std::array::from_fn(|j| weights[j]);
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(w, m)| w * m)
                .sum::<f64>();

        let mut model = LinearModel {
            coefficients,
            intercept,
            n_samples: n,
            training_r2: 0.0,
        };
        model.training_r2 = model.score(samples);

        debug!(
            "fitted {} samples: coefficients={:?} intercept={} r2={}",
            n, model.coefficients, model.intercept, model.training_r2
        );
        Ok(model)
    }

    /// Fits the model served by the API.
    pub fn embedded() -> Result<Self, ModelError> {
        Self::fit(&TRAINING_SET)
    }

    pub fn predict(&self, features: [f64; FEATURES]) -> f64 {
        self.coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }

    pub fn coefficients(&self) -> [f64; FEATURES] {
        self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// R² on the data the model was fitted on, computed once by `fit`.
    pub fn training_r2(&self) -> f64 {
        self.training_r2
    }

    /// Coefficient of determination over `samples`.
    ///
    /// A constant target scores 1.0 when predicted exactly and 0.0 otherwise.
    pub fn score(&self, samples: &[Sample]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let y_mean = samples.iter().map(|(_, y)| y).sum::<f64>() / samples.len() as f64;
        let (ss_res, ss_tot) = samples.iter().fold((0.0, 0.0), |(res, tot), (x, y)| {
            let residual = y - self.predict(*x);
            (res + residual * residual, tot + (y - y_mean) * (y - y_mean))
        });

        if ss_tot == 0.0 {
            if ss_res == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        }
    }

    pub fn get_model_info(&self) -> ModelInfo {
        ModelInfo {
            coefficients: self.coefficients.to_vec(),
            intercept: self.intercept,
            r2: self.training_r2,
            n_samples: self.n_samples,
            features: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ModelInfo {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub r2: f64,
    pub n_samples: usize,
    pub features: Vec<String>,
}

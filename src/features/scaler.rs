//! Per-feature standardization: (x - mean) / std in fixed feature order.
//! Fitted parameters are persisted as the `scaler` artifact.

use crate::error::{EngineError, Result};
use crate::metrics::{MetricRecord, FEATURE_DIM, FEATURE_NAMES};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; FEATURE_DIM],
    pub std: [f64; FEATURE_DIM],
}

impl StandardScaler {
    /// Fit mean and population standard deviation per feature. Rejects an
    /// empty corpus and any zero-variance feature (division would be
    /// undefined at transform time).
    pub fn fit(corpus: &[MetricRecord]) -> Result<Self> {
        if corpus.is_empty() {
            return Err(EngineError::EmptyCorpus);
        }
        let n = corpus.len() as f64;

        let mut mean = [0.0f64; FEATURE_DIM];
        for record in corpus {
            let features = record.to_features();
            for (m, x) in mean.iter_mut().zip(features.iter()) {
                *m += x;
            }
        }
        for m in mean.iter_mut() {
            *m /= n;
        }

        let mut var = [0.0f64; FEATURE_DIM];
        for record in corpus {
            let features = record.to_features();
            for i in 0..FEATURE_DIM {
                let d = features[i] - mean[i];
                var[i] += d * d;
            }
        }

        let mut std = [0.0f64; FEATURE_DIM];
        for i in 0..FEATURE_DIM {
            std[i] = (var[i] / n).sqrt();
            if std[i] <= 0.0 {
                return Err(EngineError::DegenerateFeature {
                    feature: FEATURE_NAMES[i],
                });
            }
        }

        Ok(Self { mean, std })
    }

    /// Standardize a single record. Inference path.
    pub fn transform(&self, record: &MetricRecord) -> [f64; FEATURE_DIM] {
        let features = record.to_features();
        let mut out = [0.0f64; FEATURE_DIM];
        for i in 0..FEATURE_DIM {
            out[i] = (features[i] - self.mean[i]) / self.std[i];
        }
        out
    }

    /// Standardize a batch into a row-per-record matrix. Row `i` is exactly
    /// `transform(&corpus[i])`.
    pub fn transform_batch(&self, corpus: &[MetricRecord]) -> Array2<f64> {
        let mut out = Array2::zeros((corpus.len(), FEATURE_DIM));
        for (i, record) in corpus.iter().enumerate() {
            let row = self.transform(record);
            for (j, v) in row.iter().enumerate() {
                out[[i, j]] = *v;
            }
        }
        out
    }
}

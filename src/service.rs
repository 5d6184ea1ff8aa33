//! Inference service: loads the artifact bundle once, then answers
//! per-request predictions with no mutable state. Construction fails fast if
//! any artifact is missing; a process without a full bundle must not serve.

use crate::error::Result;
use crate::features::StandardScaler;
use crate::metrics::{MetricRecord, RiskLevel, RISK_LEVELS};
use crate::model::{IsolationForest, RandomForestClassifier};
use crate::storage::{self, ArtifactStore};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Per-request prediction output. `risk_score` is the winning class
/// probability; `anomaly_score` is relative (lower = more anomalous).
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub anomaly_score: f64,
    pub details: PredictionDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionDetails {
    pub probabilities: BTreeMap<RiskLevel, f64>,
}

#[derive(Debug)]
pub struct InferenceService {
    scaler: StandardScaler,
    classifier: RandomForestClassifier,
    detector: IsolationForest,
}

impl InferenceService {
    /// Load all three artifacts. Any missing or unreadable blob aborts
    /// construction; no partially-initialized service is ever returned.
    pub fn load(store: &ArtifactStore) -> Result<Self> {
        let scaler: StandardScaler = store.load(storage::SCALER)?;
        let classifier: RandomForestClassifier = store.load(storage::RISK_CLASSIFIER)?;
        let detector: IsolationForest = store.load(storage::ANOMALY_DETECTOR)?;
        info!("loaded artifact bundle for inference");
        Ok(Self {
            scaler,
            classifier,
            detector,
        })
    }

    /// Normalize → classify → anomaly-score. Deterministic for a given input
    /// and loaded bundle; the only side effect is the request log line.
    pub fn predict(&self, record: &MetricRecord) -> PredictionResult {
        info!(record = ?record, "scoring metric record");

        let normalized = self.scaler.transform(record);
        let (risk_level, probs) = self.classifier.predict(&normalized);
        let anomaly_score = self.detector.decision_function(&normalized);

        let mut probabilities = BTreeMap::new();
        for level in RISK_LEVELS {
            probabilities.insert(level, probs[level.index()]);
        }
        let risk_score = probs[risk_level.index()];

        PredictionResult {
            risk_level,
            risk_score,
            anomaly_score,
            details: PredictionDetails { probabilities },
        }
    }
}

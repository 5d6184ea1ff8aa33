//! Offline training orchestrator: corpus → scaler → classifier → anomaly
//! detector, persisting each artifact only after its stage fits successfully.
//! Any stage failure aborts the run and leaves earlier artifacts untouched.

use crate::config::EngineConfig;
use crate::data;
use crate::error::Result;
use crate::features::StandardScaler;
use crate::metrics::{MetricRecord, RiskLevel};
use crate::model::{stratified_split, ClassificationReport, IsolationForest, RandomForestClassifier};
use crate::storage::{self, ArtifactStore};
use ndarray::Array2;
use serde::Serialize;
use tracing::info;

/// Outcome summary for the caller to log; the full per-class report is only
/// logged here, never returned.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSummary {
    pub samples: usize,
    pub label_counts: [usize; 3],
    pub test_accuracy: f64,
}

pub struct Trainer {
    config: EngineConfig,
    store: ArtifactStore,
}

impl Trainer {
    pub fn new(config: EngineConfig, store: ArtifactStore) -> Self {
        Self { config, store }
    }

    /// Run the full training sequence. Each step is fatal on failure; there
    /// is no partial retraining.
    pub fn run(&self) -> Result<TrainingSummary> {
        let t = &self.config.training;
        info!(samples = t.samples, seed = t.seed, "starting training run");

        let corpus = data::generate(t.samples, t.seed);
        let records: Vec<MetricRecord> = corpus.iter().map(|e| e.record).collect();
        let labels: Vec<RiskLevel> = corpus.iter().map(|e| e.label).collect();
        let mut label_counts = [0usize; 3];
        for l in &labels {
            label_counts[l.index()] += 1;
        }
        info!(
            low = label_counts[0],
            medium = label_counts[1],
            high = label_counts[2],
            "generated synthetic corpus"
        );

        let scaler = StandardScaler::fit(&records)?;
        self.store.save(storage::SCALER, &scaler)?;

        let x = scaler.transform_batch(&records);
        let (train_idx, test_idx) = stratified_split(&labels, t.test_fraction, t.seed);
        let x_train = select_rows(&x, &train_idx);
        let y_train: Vec<RiskLevel> = train_idx.iter().map(|&i| labels[i]).collect();

        let classifier =
            RandomForestClassifier::fit(x_train.view(), &y_train, &t.classifier, t.seed)?;
        info!(trees = classifier.n_trees(), "fitted risk classifier");

        let y_test: Vec<RiskLevel> = test_idx.iter().map(|&i| labels[i]).collect();
        let predicted: Vec<RiskLevel> = test_idx
            .iter()
            .map(|&i| {
                let mut row = [0.0f64; crate::metrics::FEATURE_DIM];
                for (j, v) in row.iter_mut().enumerate() {
                    *v = x[[i, j]];
                }
                classifier.predict(&row).0
            })
            .collect();
        let report = ClassificationReport::compute(&y_test, &predicted);
        info!(accuracy = report.accuracy, "risk classifier report:\n{report}");

        self.store.save(storage::RISK_CLASSIFIER, &classifier)?;

        let detector = IsolationForest::fit(x.view(), &t.anomaly, t.seed)?;
        info!(trees = detector.n_trees(), "fitted anomaly detector");
        self.store.save(storage::ANOMALY_DETECTOR, &detector)?;

        Ok(TrainingSummary {
            samples: t.samples,
            label_counts,
            test_accuracy: report.accuracy,
        })
    }
}

fn select_rows(x: &Array2<f64>, indices: &[usize]) -> Array2<f64> {
    let mut out = Array2::zeros((indices.len(), x.ncols()));
    for (r, &i) in indices.iter().enumerate() {
        for j in 0..x.ncols() {
            out[[r, j]] = x[[i, j]];
        }
    }
    out
}

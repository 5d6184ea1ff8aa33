//! Reliability Engine — operational risk scoring from runtime system metrics.
//!
//! Modular structure:
//! - [`metrics`] — Fixed-shape metric record, risk levels, training examples
//! - [`data`] — Seeded synthetic training corpus generation
//! - [`features`] — Per-feature standardization (fit once, apply per request)
//! - [`model`] — Random-forest risk classifier and isolation-forest anomaly scorer
//! - [`storage`] — Named artifact store with checksummed JSON blobs
//! - [`train`] — Offline training orchestrator producing the artifact bundle
//! - [`service`] — Load-once inference service: normalize → classify → anomaly-score
//! - [`recommend`] — Rule-based remediation guidance
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod recommend;
pub mod service;
pub mod storage;
pub mod train;

pub use config::EngineConfig;
pub use error::EngineError;
pub use features::StandardScaler;
pub use logging::StructuredLogger;
pub use metrics::{MetricRecord, RiskLevel, TrainingExample, FEATURE_DIM};
pub use model::{IsolationForest, RandomForestClassifier};
pub use recommend::{recommend, Recommendation};
pub use service::{InferenceService, PredictionResult};
pub use storage::ArtifactStore;
pub use train::Trainer;

//! Error taxonomy. Construction-time errors (missing artifacts, degenerate
//! training data) are fatal; per-request prediction has no expected failure modes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A required artifact blob is absent from the store. Fatal at service
    /// startup; the caller must not substitute defaults.
    #[error("artifact '{name}' is missing from the store")]
    ArtifactMissing { name: String },

    /// An artifact exists but cannot be decoded, or its checksum does not match.
    #[error("artifact '{name}' is corrupt: {reason}")]
    ArtifactCorrupt { name: String, reason: String },

    /// A feature had zero variance in the training corpus; standardization
    /// would divide by zero. Fatal for training.
    #[error("feature '{feature}' has zero variance in the training corpus")]
    DegenerateFeature { feature: &'static str },

    /// Fit was invoked on an empty corpus.
    #[error("training corpus is empty")]
    EmptyCorpus,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

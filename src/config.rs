//! Engine configuration: artifact directory, training hyperparameters, logging.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding the persisted artifact bundle
    pub models_dir: PathBuf,
    /// Training hyperparameters
    pub training: TrainingConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Synthetic corpus size
    pub samples: usize,
    /// RNG seed: same seed + samples gives a byte-identical corpus
    pub seed: u64,
    /// Held-out fraction for classifier evaluation
    pub test_fraction: f64,
    pub classifier: ClassifierConfig,
    pub anomaly: AnomalyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub trees: usize,
    pub max_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyConfig {
    pub trees: usize,
    /// Expected fraction of anomalous samples; sets the score offset at fit
    pub contamination: f64,
    /// Subsample size per tree
    pub max_samples: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
            training: TrainingConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            samples: 8000,
            seed: 42,
            test_fraction: 0.2,
            classifier: ClassifierConfig::default(),
            anomaly: AnomalyConfig::default(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            trees: 200,
            max_depth: 8,
        }
    }
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            trees: 150,
            contamination: 0.05,
            max_samples: 256,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl EngineConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<EngineConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}

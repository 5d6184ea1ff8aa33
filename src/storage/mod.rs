//! Artifact store: named JSON blobs under a models directory. Each blob is
//! wrapped in an envelope carrying a payload checksum and creation timestamp,
//! and is replaced atomically (temp file + rename) on retrain.

use crate::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Artifact names consumed by the inference service.
pub const SCALER: &str = "scaler";
pub const RISK_CLASSIFIER: &str = "risk_classifier";
pub const ANOMALY_DETECTOR: &str = "anomaly_detector";

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    name: String,
    created_at: DateTime<Utc>,
    sha256: String,
    payload: serde_json::Value,
}

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).exists()
    }

    /// Persist an artifact under `name`, replacing any previous version
    /// atomically.
    pub fn save<T: Serialize>(&self, name: &str, artifact: &T) -> Result<()> {
        let payload = serde_json::to_value(artifact)?;
        let payload_bytes = serde_json::to_vec(&payload)?;
        let envelope = Envelope {
            name: name.to_string(),
            created_at: Utc::now(),
            sha256: hex::encode(Sha256::digest(&payload_bytes)),
            payload,
        };

        let tmp = self.dir.join(format!(".{name}.json.tmp"));
        fs::write(&tmp, serde_json::to_vec(&envelope)?)?;
        fs::rename(&tmp, self.path_for(name))?;
        tracing::info!(artifact = name, "persisted artifact");
        Ok(())
    }

    /// Load an artifact by name. A missing blob is a distinguishable error,
    /// never a silent default; a decode or checksum failure is corruption.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.path_for(name);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EngineError::ArtifactMissing {
                    name: name.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let envelope: Envelope =
            serde_json::from_slice(&data).map_err(|e| EngineError::ArtifactCorrupt {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        let payload_bytes = serde_json::to_vec(&envelope.payload)?;
        let digest = hex::encode(Sha256::digest(&payload_bytes));
        if digest != envelope.sha256 {
            return Err(EngineError::ArtifactCorrupt {
                name: name.to_string(),
                reason: "checksum mismatch".to_string(),
            });
        }

        serde_json::from_value(envelope.payload).map_err(|e| EngineError::ArtifactCorrupt {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

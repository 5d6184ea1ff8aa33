//! Fixed-shape metric record and risk levels. Field order is significant: it is
//! the feature-vector order consumed by the scaler and both trained models.

use serde::{Deserialize, Serialize};

/// Number of features in a metric record.
pub const FEATURE_DIM: usize = 7;

/// Feature names, in the fixed order shared with [`MetricRecord::to_features`].
pub const FEATURE_NAMES: [&str; FEATURE_DIM] = [
    "cpu_usage",
    "memory_usage",
    "disk_usage",
    "network_latency_ms",
    "error_rate",
    "packet_loss",
    "requests_per_min",
];

/// One snapshot of runtime metrics. Immutable once received; percentages are
/// 0–100, latency and throughput are non-negative (bounds enforced upstream).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub network_latency_ms: f64,
    pub error_rate: f64,
    pub packet_loss: f64,
    pub requests_per_min: f64,
}

impl MetricRecord {
    /// Convert to the raw feature vector, in [`FEATURE_NAMES`] order. This is
    /// the only place the record becomes a vector.
    pub fn to_features(&self) -> [f64; FEATURE_DIM] {
        [
            self.cpu_usage,
            self.memory_usage,
            self.disk_usage,
            self.network_latency_ms,
            self.error_rate,
            self.packet_loss,
            self.requests_per_min,
        ]
    }
}

/// Risk severity, ordered LOW < MEDIUM < HIGH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// All levels in severity order; index matches the classifier's class axis.
pub const RISK_LEVELS: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

impl RiskLevel {
    /// Label a continuous risk score in [0,1]. Boundaries are inclusive:
    /// 0.30 is LOW, 0.60 is MEDIUM.
    pub fn from_risk_score(score: f64) -> Self {
        if score <= 0.30 {
            RiskLevel::Low
        } else if score <= 0.60 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    /// Index into [`RISK_LEVELS`] / probability arrays.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled training row: raw metrics plus the derived score and level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    pub record: MetricRecord,
    pub risk_score: f64,
    pub label: RiskLevel,
}

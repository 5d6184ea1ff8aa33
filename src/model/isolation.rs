//! Isolation-forest anomaly scorer. Unsupervised: trees isolate points with
//! random axis-aligned cuts; short average path lengths mean anomalous.
//! Scores follow the decision_function convention: lower = more anomalous,
//! with the zero point set by the contamination quantile of the training set.

use crate::config::AnomalyConfig;
use crate::error::{EngineError, Result};
use crate::metrics::FEATURE_DIM;
use ndarray::ArrayView2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    trees: Vec<Node>,
    /// Subsample size each tree was grown on
    subsample: usize,
    /// Contamination-quantile of training score_samples; decision_function zero point
    offset: f64,
}

/// Euler–Mascheroni constant, for the harmonic-number approximation.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Average unsuccessful-search path length in a BST of n nodes. Standard
/// normalizer from the isolation-forest formulation.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            let harmonic = (n - 1.0).ln() + EULER_GAMMA;
            2.0 * harmonic - 2.0 * (n - 1.0) / n
        }
    }
}

impl IsolationForest {
    /// Fit on normalized feature rows. Labels are never consulted.
    pub fn fit(x: ArrayView2<'_, f64>, config: &AnomalyConfig, seed: u64) -> Result<Self> {
        let n = x.nrows();
        if n == 0 {
            return Err(EngineError::EmptyCorpus);
        }
        let subsample = config.max_samples.min(n).max(2);
        let depth_cap = (subsample as f64).log2().ceil() as usize;

        let mut trees = Vec::with_capacity(config.trees);
        for t in 0..config.trees {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(t as u64));
            let mut all: Vec<usize> = (0..n).collect();
            all.shuffle(&mut rng);
            all.truncate(subsample);
            trees.push(build_tree(&x, all, 0, depth_cap, &mut rng));
        }

        let mut forest = Self {
            trees,
            subsample,
            offset: 0.0,
        };

        // Set the zero point so that roughly `contamination` of the training
        // rows score negative.
        let mut training_scores: Vec<f64> = (0..n)
            .map(|i| {
                let mut row = [0.0f64; FEATURE_DIM];
                for j in 0..FEATURE_DIM {
                    row[j] = x[[i, j]];
                }
                forest.score_samples(&row)
            })
            .collect();
        training_scores.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        forest.offset = quantile(&training_scores, config.contamination);
        Ok(forest)
    }

    /// Raw score in (-1, 0): closer to -1 is more anomalous.
    fn score_samples(&self, features: &[f64; FEATURE_DIM]) -> f64 {
        let mean_path: f64 = self
            .trees
            .iter()
            .map(|t| path_length(t, features, 0))
            .sum::<f64>()
            / self.trees.len() as f64;
        let norm = average_path_length(self.subsample);
        -(2.0f64).powf(-mean_path / norm)
    }

    /// Shifted score: negative for the most anomalous ~contamination fraction
    /// of the training distribution. Relative, not absolute; monotonically
    /// lower for more anomalous inputs.
    pub fn decision_function(&self, features: &[f64; FEATURE_DIM]) -> f64 {
        self.score_samples(features) - self.offset
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

fn build_tree(
    x: &ArrayView2<'_, f64>,
    indices: Vec<usize>,
    depth: usize,
    depth_cap: usize,
    rng: &mut ChaCha8Rng,
) -> Node {
    if depth >= depth_cap || indices.len() <= 1 {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    // Pick a feature that still has spread in this node; constant features
    // cannot isolate anything.
    let mut candidates: Vec<usize> = (0..FEATURE_DIM).collect();
    candidates.shuffle(rng);
    let mut chosen: Option<(usize, f64, f64)> = None;
    for f in candidates {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &i in &indices {
            let v = x[[i, f]];
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if hi > lo {
            chosen = Some((f, lo, hi));
            break;
        }
    }
    let Some((feature, lo, hi)) = chosen else {
        return Node::Leaf {
            size: indices.len(),
        };
    };

    let threshold = rng.gen_range(lo..hi);
    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
        indices.into_iter().partition(|&i| x[[i, feature]] <= threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_tree(x, left_idx, depth + 1, depth_cap, rng)),
        right: Box::new(build_tree(x, right_idx, depth + 1, depth_cap, rng)),
    }
}

fn path_length(node: &Node, features: &[f64; FEATURE_DIM], depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            if features[*feature] <= *threshold {
                path_length(left, features, depth + 1)
            } else {
                path_length(right, features, depth + 1)
            }
        }
    }
}

/// Linear-interpolated quantile of an ascending-sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnomalyConfig;
    use crate::data;
    use crate::features::StandardScaler;
    use crate::metrics::MetricRecord;

    fn small_config() -> AnomalyConfig {
        AnomalyConfig {
            trees: 50,
            contamination: 0.05,
            max_samples: 128,
        }
    }

    fn fitted() -> (StandardScaler, IsolationForest) {
        let records: Vec<MetricRecord> =
            data::generate(1000, 42).into_iter().map(|e| e.record).collect();
        let scaler = StandardScaler::fit(&records).unwrap();
        let x = scaler.transform_batch(&records);
        let forest = IsolationForest::fit(x.view(), &small_config(), 99).unwrap();
        (scaler, forest)
    }

    #[test]
    fn outlier_scores_below_inlier() {
        let (scaler, forest) = fitted();
        let typical = MetricRecord {
            cpu_usage: 50.0,
            memory_usage: 55.0,
            disk_usage: 60.0,
            network_latency_ms: 120.0,
            error_rate: 2.0,
            packet_loss: 1.0,
            requests_per_min: 2000.0,
        };
        let extreme = MetricRecord {
            cpu_usage: 100.0,
            memory_usage: 100.0,
            disk_usage: 100.0,
            network_latency_ms: 2000.0,
            error_rate: 80.0,
            packet_loss: 60.0,
            requests_per_min: 20000.0,
        };
        let s_typical = forest.decision_function(&scaler.transform(&typical));
        let s_extreme = forest.decision_function(&scaler.transform(&extreme));
        assert!(
            s_extreme < s_typical,
            "extreme {s_extreme} should score below typical {s_typical}"
        );
        assert!(s_extreme < 0.0, "far outlier should be past the offset");
    }

    #[test]
    fn contamination_sets_training_negative_fraction() {
        let records: Vec<MetricRecord> =
            data::generate(1000, 42).into_iter().map(|e| e.record).collect();
        let scaler = StandardScaler::fit(&records).unwrap();
        let x = scaler.transform_batch(&records);
        let forest = IsolationForest::fit(x.view(), &small_config(), 99).unwrap();
        let negative = records
            .iter()
            .filter(|r| forest.decision_function(&scaler.transform(r)) < 0.0)
            .count();
        let fraction = negative as f64 / records.len() as f64;
        assert!(
            (0.0..=0.10).contains(&fraction),
            "negative fraction {fraction} should sit near contamination 0.05"
        );
    }

    #[test]
    fn scoring_is_deterministic() {
        let (scaler, forest) = fitted();
        let r = MetricRecord {
            cpu_usage: 42.0,
            memory_usage: 58.0,
            disk_usage: 61.0,
            network_latency_ms: 130.0,
            error_rate: 1.5,
            packet_loss: 0.5,
            requests_per_min: 1800.0,
        };
        let v = scaler.transform(&r);
        assert_eq!(forest.decision_function(&v), forest.decision_function(&v));
    }

    #[test]
    fn survives_serde_round_trip() {
        let (scaler, forest) = fitted();
        let json = serde_json::to_string(&forest).unwrap();
        let back: IsolationForest = serde_json::from_str(&json).unwrap();
        let v = scaler.transform(&MetricRecord {
            cpu_usage: 30.0,
            memory_usage: 40.0,
            disk_usage: 50.0,
            network_latency_ms: 100.0,
            error_rate: 1.0,
            packet_loss: 0.2,
            requests_per_min: 1500.0,
        });
        assert_eq!(forest.decision_function(&v), back.decision_function(&v));
    }
}

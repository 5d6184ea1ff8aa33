//! Random-forest risk classifier: bootstrap-sampled CART trees with weighted
//! Gini splits. Class imbalance is handled with explicit inverse-frequency
//! class weights applied to every sample during fit.

use crate::config::ClassifierConfig;
use crate::error::{EngineError, Result};
use crate::metrics::{RiskLevel, FEATURE_DIM, RISK_LEVELS};
use ndarray::ArrayView2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const N_CLASSES: usize = RISK_LEVELS.len();
/// Feature subset size per split: ceil(sqrt(FEATURE_DIM)).
const FEATURES_PER_SPLIT: usize = 3;
/// Minimum weight a split side must carry to be considered.
const MIN_LEAF_WEIGHT: f64 = 1e-12;

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        /// Weighted class distribution at the leaf, normalized to sum 1
        probs: [f64; N_CLASSES],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<Node>,
    max_depth: usize,
}

impl RandomForestClassifier {
    /// Fit on normalized feature rows `x` against `labels`. Each sample
    /// carries weight n_samples / (n_classes_present * class_count), so rare
    /// classes contribute as much total weight as common ones.
    pub fn fit(
        x: ArrayView2<'_, f64>,
        labels: &[RiskLevel],
        config: &ClassifierConfig,
        seed: u64,
    ) -> Result<Self> {
        let n = x.nrows();
        if n == 0 || labels.len() != n {
            return Err(EngineError::EmptyCorpus);
        }

        let mut counts = [0usize; N_CLASSES];
        for label in labels {
            counts[label.index()] += 1;
        }
        let present = counts.iter().filter(|&&c| c > 0).count();
        let mut class_weight = [0.0f64; N_CLASSES];
        for c in 0..N_CLASSES {
            if counts[c] > 0 {
                class_weight[c] = n as f64 / (present as f64 * counts[c] as f64);
            }
        }
        let sample_weight: Vec<f64> = labels.iter().map(|l| class_weight[l.index()]).collect();

        let mut trees = Vec::with_capacity(config.trees);
        for t in 0..config.trees {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(t as u64));
            let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            trees.push(build_tree(
                &x,
                labels,
                &sample_weight,
                indices,
                0,
                config.max_depth,
                &mut rng,
            ));
        }

        Ok(Self {
            trees,
            max_depth: config.max_depth,
        })
    }

    /// Class probabilities for one normalized vector: the average of the leaf
    /// distributions reached in every tree. Non-negative, sums to 1.
    pub fn predict_proba(&self, features: &[f64; FEATURE_DIM]) -> [f64; N_CLASSES] {
        let mut acc = [0.0f64; N_CLASSES];
        for tree in &self.trees {
            let leaf = descend(tree, features);
            for c in 0..N_CLASSES {
                acc[c] += leaf[c];
            }
        }
        let total: f64 = acc.iter().sum();
        if total > 0.0 {
            for p in acc.iter_mut() {
                *p /= total;
            }
        }
        acc
    }

    /// Predicted label plus full class distribution. Ties resolve to the
    /// lower severity (stable argmax in class order).
    pub fn predict(&self, features: &[f64; FEATURE_DIM]) -> (RiskLevel, [f64; N_CLASSES]) {
        let probs = self.predict_proba(features);
        let mut best = 0;
        for c in 1..N_CLASSES {
            if probs[c] > probs[best] {
                best = c;
            }
        }
        (RISK_LEVELS[best], probs)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

fn descend<'a>(mut node: &'a Node, features: &[f64; FEATURE_DIM]) -> &'a [f64; N_CLASSES] {
    loop {
        match node {
            Node::Leaf { probs } => return probs,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                node = if features[*feature] <= *threshold {
                    left
                } else {
                    right
                };
            }
        }
    }
}

fn weighted_dist(labels: &[RiskLevel], weights: &[f64], indices: &[usize]) -> [f64; N_CLASSES] {
    let mut dist = [0.0f64; N_CLASSES];
    for &i in indices {
        dist[labels[i].index()] += weights[i];
    }
    dist
}

fn gini(dist: &[f64; N_CLASSES], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    let mut g = 1.0;
    for &w in dist {
        let p = w / total;
        g -= p * p;
    }
    g
}

fn leaf_from(dist: [f64; N_CLASSES]) -> Node {
    let total: f64 = dist.iter().sum();
    let mut probs = dist;
    if total > 0.0 {
        for p in probs.iter_mut() {
            *p /= total;
        }
    }
    Node::Leaf { probs }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn build_tree(
    x: &ArrayView2<'_, f64>,
    labels: &[RiskLevel],
    weights: &[f64],
    indices: Vec<usize>,
    depth: usize,
    max_depth: usize,
    rng: &mut ChaCha8Rng,
) -> Node {
    let dist = weighted_dist(labels, weights, &indices);
    let total: f64 = dist.iter().sum();
    let node_gini = gini(&dist, total);

    if depth >= max_depth || indices.len() < 2 || node_gini <= 0.0 {
        return leaf_from(dist);
    }

    let features = sample_features(rng);
    let mut best: Option<BestSplit> = None;

    for &feature in &features {
        // Sort once per candidate feature, then scan split points with
        // running weighted class sums.
        let mut order: Vec<usize> = indices.clone();
        order.sort_by(|&a, &b| {
            x[[a, feature]]
                .partial_cmp(&x[[b, feature]])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut left_dist = [0.0f64; N_CLASSES];
        let mut left_total = 0.0f64;
        for w in 0..order.len() - 1 {
            let i = order[w];
            left_dist[labels[i].index()] += weights[i];
            left_total += weights[i];

            let v = x[[i, feature]];
            let v_next = x[[order[w + 1], feature]];
            if v_next <= v {
                continue; // no split point between equal values
            }

            let right_total = total - left_total;
            if left_total < MIN_LEAF_WEIGHT || right_total < MIN_LEAF_WEIGHT {
                continue;
            }
            let mut right_dist = [0.0f64; N_CLASSES];
            for c in 0..N_CLASSES {
                right_dist[c] = dist[c] - left_dist[c];
            }
            let impurity = (left_total * gini(&left_dist, left_total)
                + right_total * gini(&right_dist, right_total))
                / total;
            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                best = Some(BestSplit {
                    feature,
                    threshold: (v + v_next) / 2.0,
                    impurity,
                });
            }
        }
    }

    let Some(split) = best else {
        return leaf_from(dist);
    };
    if split.impurity >= node_gini {
        return leaf_from(dist);
    }

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| x[[i, split.feature]] <= split.threshold);
    if left_idx.is_empty() || right_idx.is_empty() {
        return leaf_from(dist);
    }

    let left = build_tree(x, labels, weights, left_idx, depth + 1, max_depth, rng);
    let right = build_tree(x, labels, weights, right_idx, depth + 1, max_depth, rng);
    Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Draw FEATURES_PER_SPLIT distinct feature indices.
fn sample_features(rng: &mut ChaCha8Rng) -> [usize; FEATURES_PER_SPLIT] {
    let mut picked = [usize::MAX; FEATURES_PER_SPLIT];
    let mut count = 0;
    while count < FEATURES_PER_SPLIT {
        let f = rng.gen_range(0..FEATURE_DIM);
        if !picked[..count].contains(&f) {
            picked[count] = f;
            count += 1;
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;
    use crate::features::StandardScaler;
    use crate::metrics::MetricRecord;

    fn small_config() -> ClassifierConfig {
        ClassifierConfig {
            trees: 30,
            max_depth: 6,
        }
    }

    fn fitted() -> (StandardScaler, RandomForestClassifier, Vec<crate::metrics::TrainingExample>) {
        let corpus = data::generate(1500, 42);
        let records: Vec<MetricRecord> = corpus.iter().map(|e| e.record).collect();
        let labels: Vec<RiskLevel> = corpus.iter().map(|e| e.label).collect();
        let scaler = StandardScaler::fit(&records).unwrap();
        let x = scaler.transform_batch(&records);
        let clf = RandomForestClassifier::fit(x.view(), &labels, &small_config(), 42).unwrap();
        (scaler, clf, corpus)
    }

    #[test]
    fn probabilities_are_a_distribution() {
        let (scaler, clf, corpus) = fitted();
        for ex in corpus.iter().take(200) {
            let probs = clf.predict_proba(&scaler.transform(&ex.record));
            let sum: f64 = probs.iter().sum();
            assert!((sum - 1.0).abs() < 1e-6, "sum = {sum}");
            assert!(probs.iter().all(|&p| p >= 0.0));
        }
    }

    #[test]
    fn learns_the_synthetic_signal() {
        let (scaler, clf, corpus) = fitted();
        let hits = corpus
            .iter()
            .filter(|ex| clf.predict(&scaler.transform(&ex.record)).0 == ex.label)
            .count();
        let accuracy = hits as f64 / corpus.len() as f64;
        assert!(accuracy > 0.85, "training accuracy {accuracy}");
    }

    #[test]
    fn prediction_is_deterministic() {
        let (scaler, clf, corpus) = fitted();
        let v = scaler.transform(&corpus[0].record);
        assert_eq!(clf.predict_proba(&v), clf.predict_proba(&v));
    }

    #[test]
    fn survives_serde_round_trip() {
        let (scaler, clf, corpus) = fitted();
        let json = serde_json::to_string(&clf).unwrap();
        let back: RandomForestClassifier = serde_json::from_str(&json).unwrap();
        let v = scaler.transform(&corpus[7].record);
        assert_eq!(clf.predict_proba(&v), back.predict_proba(&v));
    }

    #[test]
    fn empty_input_is_rejected() {
        let x = ndarray::Array2::<f64>::zeros((0, FEATURE_DIM));
        assert!(RandomForestClassifier::fit(x.view(), &[], &small_config(), 1).is_err());
    }
}

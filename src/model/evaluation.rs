//! Hold-out evaluation: stratified train/test split and a per-class
//! precision/recall/F1 report. The report is logged during training, never
//! returned to prediction callers.

use crate::metrics::{RiskLevel, RISK_LEVELS};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Split row indices stratified by label: each label contributes
/// ceil(count * test_fraction) rows to the test side, drawn after a seeded
/// per-label shuffle. Every label with at least two rows appears on both sides.
pub fn stratified_split(
    labels: &[RiskLevel],
    test_fraction: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for level in RISK_LEVELS {
        let mut rows: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == level)
            .map(|(i, _)| i)
            .collect();
        if rows.is_empty() {
            continue;
        }
        rows.shuffle(&mut rng);
        let n_test = ((rows.len() as f64 * test_fraction).ceil() as usize).min(rows.len());
        test.extend_from_slice(&rows[..n_test]);
        train.extend_from_slice(&rows[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class evaluation over a labeled prediction set.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    pub per_class: [(RiskLevel, ClassMetrics); 3],
    pub accuracy: f64,
    pub total: usize,
}

impl ClassificationReport {
    pub fn compute(truth: &[RiskLevel], predicted: &[RiskLevel]) -> Self {
        debug_assert_eq!(truth.len(), predicted.len());
        let total = truth.len();

        let mut tp = [0usize; 3];
        let mut fp = [0usize; 3];
        let mut fn_ = [0usize; 3];
        let mut support = [0usize; 3];
        let mut correct = 0usize;

        for (t, p) in truth.iter().zip(predicted.iter()) {
            support[t.index()] += 1;
            if t == p {
                tp[t.index()] += 1;
                correct += 1;
            } else {
                fp[p.index()] += 1;
                fn_[t.index()] += 1;
            }
        }

        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        let per_class = RISK_LEVELS.map(|level| {
            let c = level.index();
            let precision = ratio(tp[c], tp[c] + fp[c]);
            let recall = ratio(tp[c], tp[c] + fn_[c]);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            (
                level,
                ClassMetrics {
                    precision,
                    recall,
                    f1,
                    support: support[c],
                },
            )
        });

        Self {
            per_class,
            accuracy: ratio(correct, total),
            total,
        }
    }
}

impl std::fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:>8} {:>10} {:>8} {:>8} {:>8}", "class", "precision", "recall", "f1", "support")?;
        for (level, m) in &self.per_class {
            writeln!(
                f,
                "{:>8} {:>10.3} {:>8.3} {:>8.3} {:>8}",
                level.as_str(),
                m.precision,
                m.recall,
                m.f1,
                m.support
            )?;
        }
        write!(f, "accuracy {:.3} on {} samples", self.accuracy, self.total)
    }
}

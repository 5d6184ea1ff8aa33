//! Seeded synthetic corpus: independent clipped Gaussians per feature, with a
//! deterministic weighted risk score so the classifier has a learnable signal.

use crate::metrics::{MetricRecord, RiskLevel, TrainingExample};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Per-feature draw parameters: (mean, std, clip_lo, clip_hi).
struct FeatureDist {
    mean: f64,
    std: f64,
    lo: f64,
    hi: f64,
}

const CPU: FeatureDist = FeatureDist { mean: 50.0, std: 15.0, lo: 0.0, hi: 100.0 };
const MEMORY: FeatureDist = FeatureDist { mean: 55.0, std: 18.0, lo: 0.0, hi: 100.0 };
const DISK: FeatureDist = FeatureDist { mean: 60.0, std: 20.0, lo: 0.0, hi: 100.0 };
const LATENCY: FeatureDist = FeatureDist { mean: 120.0, std: 60.0, lo: 5.0, hi: f64::INFINITY };
const ERROR_RATE: FeatureDist = FeatureDist { mean: 2.0, std: 3.0, lo: 0.0, hi: 100.0 };
const PACKET_LOSS: FeatureDist = FeatureDist { mean: 1.0, std: 2.0, lo: 0.0, hi: 100.0 };
const RPM: FeatureDist = FeatureDist { mean: 2000.0, std: 800.0, lo: 50.0, hi: f64::INFINITY };

impl FeatureDist {
    fn sample(&self, rng: &mut ChaCha8Rng) -> f64 {
        (self.mean + self.std * standard_normal(rng)).clamp(self.lo, self.hi)
    }
}

/// Box–Muller transform over the seeded stream. Two uniform draws per call
/// keeps the stream layout fixed, which is what makes the corpus reproducible.
fn standard_normal(rng: &mut ChaCha8Rng) -> f64 {
    let u1: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Weighted risk score from the clipped feature values, clipped to [0,1].
/// Realistic feature ranges keep the weighted sum below 1 on their own.
pub(crate) fn risk_score(record: &MetricRecord) -> f64 {
    let score = 0.25 * (record.cpu_usage / 100.0)
        + 0.20 * (record.memory_usage / 100.0)
        + 0.20 * (record.disk_usage / 100.0)
        + 0.15 * (record.network_latency_ms / 500.0)
        + 0.10 * (record.error_rate / 100.0)
        + 0.05 * (record.packet_loss / 100.0)
        + 0.05 * (record.requests_per_min / 5000.0);
    score.clamp(0.0, 1.0)
}

/// Generate `samples` labeled examples. Same (seed, samples) produces a
/// byte-identical corpus.
pub fn generate(samples: usize, seed: u64) -> Vec<TrainingExample> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(samples);
    for _ in 0..samples {
        let record = MetricRecord {
            cpu_usage: CPU.sample(&mut rng),
            memory_usage: MEMORY.sample(&mut rng),
            disk_usage: DISK.sample(&mut rng),
            network_latency_ms: LATENCY.sample(&mut rng),
            error_rate: ERROR_RATE.sample(&mut rng),
            packet_loss: PACKET_LOSS.sample(&mut rng),
            requests_per_min: RPM.sample(&mut rng),
        };
        let score = risk_score(&record);
        out.push(TrainingExample {
            record,
            risk_score: score,
            label: RiskLevel::from_risk_score(score),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::RiskLevel;

    #[test]
    fn same_seed_is_byte_identical() {
        let a = generate(500, 42);
        let b = generate(500, 42);
        let ja = serde_json::to_vec(&a).unwrap();
        let jb = serde_json::to_vec(&b).unwrap();
        assert_eq!(ja, jb);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate(100, 42);
        let b = generate(100, 43);
        assert_ne!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    #[test]
    fn features_respect_clip_ranges() {
        for ex in generate(2000, 7) {
            let r = &ex.record;
            assert!((0.0..=100.0).contains(&r.cpu_usage));
            assert!((0.0..=100.0).contains(&r.memory_usage));
            assert!((0.0..=100.0).contains(&r.disk_usage));
            assert!(r.network_latency_ms >= 5.0);
            assert!((0.0..=100.0).contains(&r.error_rate));
            assert!((0.0..=100.0).contains(&r.packet_loss));
            assert!(r.requests_per_min >= 50.0);
            assert!((0.0..=1.0).contains(&ex.risk_score));
            assert_eq!(ex.label, RiskLevel::from_risk_score(ex.risk_score));
        }
    }

    #[test]
    fn all_three_labels_occur() {
        let corpus = generate(4000, 42);
        let mut counts = [0usize; 3];
        for ex in &corpus {
            counts[ex.label.index()] += 1;
        }
        assert!(counts.iter().all(|&c| c > 0), "label counts: {counts:?}");
    }
}

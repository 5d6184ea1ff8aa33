//! Rule-based remediation guidance. Pure function of (risk level, raw
//! metrics): a tier-1 baseline keyed by the risk level, then tier-2
//! metric-triggered actions appended in a fixed evaluation order.

use crate::metrics::{MetricRecord, RiskLevel};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub risk_level: RiskLevel,
    pub summary: String,
    pub recommended_actions: Vec<String>,
}

/// Tier-2 thresholds are strict (`>`); each check contributes at most one
/// fixed action string, independently of the others.
pub fn recommend(risk_level: RiskLevel, record: &MetricRecord) -> Recommendation {
    let mut actions: Vec<String> = Vec::new();

    let summary = match risk_level {
        RiskLevel::Low => {
            actions.push("Continue regular monitoring of key metrics.".to_string());
            actions.push("Review alerts configuration weekly.".to_string());
            "System is healthy with low risk."
        }
        RiskLevel::Medium => {
            actions.push("Review recent deployments and configuration changes.".to_string());
            actions.push("Increase logging temporarily.".to_string());
            "System shows moderate risk."
        }
        RiskLevel::High => {
            actions.push("Trigger incident response.".to_string());
            actions.push("Scale affected services or reduce load.".to_string());
            actions.push("Capture detailed logs for review.".to_string());
            "System is under high risk of failure."
        }
    };

    if record.cpu_usage > 80.0 {
        actions.push("Investigate CPU spikes and heavy workloads.".to_string());
    }
    if record.memory_usage > 80.0 {
        actions.push("Check memory leaks and optimize usage.".to_string());
    }
    if record.disk_usage > 85.0 {
        actions.push("Clean unused files or expand storage.".to_string());
    }
    if record.network_latency_ms > 250.0 {
        actions.push("Check dependencies causing high latency.".to_string());
    }
    if record.error_rate > 5.0 {
        actions.push("Investigate failing services and roll back changes.".to_string());
    }
    if record.packet_loss > 3.0 {
        actions.push("Check network routing or load balancer.".to_string());
    }
    if record.requests_per_min > 4000.0 {
        actions.push("Enable autoscaling or reduce incoming requests.".to_string());
    }

    Recommendation {
        risk_level,
        summary: summary.to_string(),
        recommended_actions: actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal() -> MetricRecord {
        MetricRecord {
            cpu_usage: 50.0,
            memory_usage: 55.0,
            disk_usage: 60.0,
            network_latency_ms: 120.0,
            error_rate: 2.0,
            packet_loss: 1.0,
            requests_per_min: 2000.0,
        }
    }

    #[test]
    fn nominal_record_gets_only_tier1() {
        let rec = recommend(RiskLevel::Low, &nominal());
        assert_eq!(rec.summary, "System is healthy with low risk.");
        assert_eq!(
            rec.recommended_actions,
            vec![
                "Continue regular monitoring of key metrics.",
                "Review alerts configuration weekly.",
            ]
        );
    }

    #[test]
    fn cpu_spike_adds_exactly_one_action() {
        let mut record = nominal();
        record.cpu_usage = 81.0;
        let baseline = recommend(RiskLevel::Low, &nominal());
        let rec = recommend(RiskLevel::Low, &record);
        assert_eq!(rec.recommended_actions.len(), baseline.recommended_actions.len() + 1);
        assert_eq!(
            rec.recommended_actions.last().unwrap(),
            "Investigate CPU spikes and heavy workloads."
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let mut record = nominal();
        record.cpu_usage = 80.0;
        record.memory_usage = 80.0;
        record.disk_usage = 85.0;
        record.network_latency_ms = 250.0;
        record.error_rate = 5.0;
        record.packet_loss = 3.0;
        record.requests_per_min = 4000.0;
        let rec = recommend(RiskLevel::Medium, &record);
        assert_eq!(rec.recommended_actions.len(), 2, "boundary values must not trigger");
    }

    #[test]
    fn all_triggers_fire_in_fixed_order() {
        let record = MetricRecord {
            cpu_usage: 95.0,
            memory_usage: 90.0,
            disk_usage: 90.0,
            network_latency_ms: 300.0,
            error_rate: 10.0,
            packet_loss: 5.0,
            requests_per_min: 5000.0,
        };
        let rec = recommend(RiskLevel::High, &record);
        assert_eq!(
            rec.recommended_actions,
            vec![
                "Trigger incident response.",
                "Scale affected services or reduce load.",
                "Capture detailed logs for review.",
                "Investigate CPU spikes and heavy workloads.",
                "Check memory leaks and optimize usage.",
                "Clean unused files or expand storage.",
                "Check dependencies causing high latency.",
                "Investigate failing services and roll back changes.",
                "Check network routing or load balancer.",
                "Enable autoscaling or reduce incoming requests.",
            ]
        );
    }

    #[test]
    fn actions_contain_no_duplicates() {
        let record = MetricRecord {
            cpu_usage: 99.0,
            memory_usage: 99.0,
            disk_usage: 99.0,
            network_latency_ms: 999.0,
            error_rate: 50.0,
            packet_loss: 50.0,
            requests_per_min: 9999.0,
        };
        let rec = recommend(RiskLevel::High, &record);
        let mut seen = std::collections::HashSet::new();
        for a in &rec.recommended_actions {
            assert!(seen.insert(a.clone()), "duplicate action: {a}");
        }
    }
}

//! Machine-readable run summary (`summary.json`).

use crate::config::CurateConfig;
use crate::gate::GateConfig;
use crate::report::TierCounts;
use serde::{Deserialize, Serialize};

/// Bumped whenever a field changes meaning or is removed.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub schema_version: u32,
    pub generated_at: String,
    pub provider: String,
    pub model: String,
    pub max_attempts: u32,
    pub concurrency: usize,
    pub thresholds: GateConfig,
    pub counts: TierCounts,
    pub premium_yield_pct: f64,
}

impl RunSummary {
    pub fn new(cfg: &CurateConfig, counts: TierCounts) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: chrono::Utc::now().to_rfc3339(),
            provider: cfg.grader.provider.to_string(),
            model: cfg.grader.model.clone(),
            max_attempts: cfg.grader.max_attempts,
            concurrency: cfg.run.concurrency,
            thresholds: cfg.gate,
            counts,
            premium_yield_pct: (counts.premium_yield_pct() * 10.0).round() / 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn summary_round_trips_with_rounded_yield() {
        let counts = TierCounts {
            total: 3,
            premium: 2,
            acceptable: 0,
            rejected: 1,
            unevaluated: 0,
        };
        let summary = RunSummary::new(&CurateConfig::default(), counts);
        assert_eq!(summary.premium_yield_pct, 66.7);
        assert_eq!(summary.provider, "ollama");

        let tmp = tempdir().unwrap();
        let path = tmp.path().join("summary.json");
        crate::io::write_json(&path, &summary).unwrap();
        let back: RunSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, summary);
        assert_eq!(back.thresholds.premium.accuracy, 8);
    }
}

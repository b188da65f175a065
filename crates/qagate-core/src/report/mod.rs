pub mod console;
pub mod progress;
pub mod summary;

use crate::gate::QualityTier;
use serde::{Deserialize, Serialize};

/// Record counts per outcome. Unevaluated records are counted apart from
/// rejected ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub total: usize,
    pub premium: usize,
    pub acceptable: usize,
    pub rejected: usize,
    pub unevaluated: usize,
}

impl TierCounts {
    pub fn record(&mut self, tier: Option<QualityTier>) {
        self.total += 1;
        match tier {
            Some(QualityTier::Premium) => self.premium += 1,
            Some(QualityTier::Acceptable) => self.acceptable += 1,
            Some(QualityTier::Rejected) => self.rejected += 1,
            None => self.unevaluated += 1,
        }
    }

    /// Share of input records that reached premium, in percent.
    pub fn premium_yield_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.premium as f64 / self.total as f64 * 100.0
        }
    }
}

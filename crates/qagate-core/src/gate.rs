//! Tier classification of graded verdicts.

use crate::model::QualityVerdict;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Premium,
    Acceptable,
    Rejected,
}

impl QualityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Premium => "premium",
            Self::Acceptable => "acceptable",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum score required on each axis (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisThresholds {
    pub accuracy: u8,
    pub style: u8,
}

impl AxisThresholds {
    pub const fn new(accuracy: u8, style: u8) -> Self {
        Self { accuracy, style }
    }

    pub fn admits(&self, verdict: &QualityVerdict) -> bool {
        verdict.accuracy.score >= self.accuracy && verdict.style.score >= self.style
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    #[serde(default = "default_premium")]
    pub premium: AxisThresholds,
    #[serde(default = "default_acceptable")]
    pub acceptable: AxisThresholds,
}

fn default_premium() -> AxisThresholds {
    AxisThresholds::new(8, 8)
}

fn default_acceptable() -> AxisThresholds {
    AxisThresholds::new(7, 7)
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            premium: default_premium(),
            acceptable: default_acceptable(),
        }
    }
}

impl GateConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, t) in [("premium", self.premium), ("acceptable", self.acceptable)] {
            for (axis, v) in [("accuracy", t.accuracy), ("style", t.style)] {
                if !(1..=10).contains(&v) {
                    return Err(format!("gate.{name}.{axis} must be within 1..=10, got {v}"));
                }
            }
        }
        if self.acceptable.accuracy > self.premium.accuracy
            || self.acceptable.style > self.premium.style
        {
            return Err(format!(
                "gate.acceptable ({}/{}) must not exceed gate.premium ({}/{})",
                self.acceptable.accuracy,
                self.acceptable.style,
                self.premium.accuracy,
                self.premium.style
            ));
        }
        Ok(())
    }
}

/// Stateless classifier; the same verdict always maps to the same tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityGate {
    config: GateConfig,
}

impl QualityGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, verdict: &QualityVerdict) -> QualityTier {
        if self.config.premium.admits(verdict) {
            QualityTier::Premium
        } else if self.config.acceptable.admits(verdict) {
            QualityTier::Acceptable
        } else {
            QualityTier::Rejected
        }
    }
}

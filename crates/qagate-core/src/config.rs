//! Run configuration, loaded from `qagate.yaml`.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults below. The CLI layers flag and environment overrides on top.

use crate::errors::{CurateError, CurateResult};
use crate::gate::GateConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "qagate.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Ollama,
    OpenAi,
    Fake,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
            Self::Fake => "fake",
        }
    }

    pub fn default_endpoint(self) -> Option<&'static str> {
        match self {
            Self::Ollama => Some("http://localhost:11434"),
            Self::OpenAi => Some("https://api.openai.com"),
            Self::Fake => None,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            "fake" => Ok(Self::Fake),
            other => Err(format!(
                "unknown provider '{other}' (expected ollama, openai or fake)"
            )),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraderConfig {
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,

    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the grading endpoint. `None` uses the provider default.
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens per call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-attempt timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wait after a failed call before the next attempt.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_provider() -> ProviderKind {
    ProviderKind::Ollama
}

fn default_model() -> String {
    "gemma2:2b".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    800
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    2000
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            endpoint: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl GraderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    pub fn effective_endpoint(&self) -> Option<String> {
        self.endpoint
            .clone()
            .or_else(|| self.provider.default_endpoint().map(str::to_string))
            .map(|url| url.trim_end_matches('/').to_string())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("grader.max_attempts must be at least 1".into());
        }
        if self.timeout_secs == 0 {
            return Err("grader.timeout_secs must be at least 1".into());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "grader.temperature must be within 0.0..=2.0, got {}",
                self.temperature
            ));
        }
        if self.max_tokens == 0 {
            return Err("grader.max_tokens must be at least 1".into());
        }
        if self.model.trim().is_empty() {
            return Err("grader.model must not be empty".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSettings {
    /// Records graded at once. 1 keeps the run strictly sequential.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    1
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurateConfig {
    #[serde(default)]
    pub grader: GraderConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub run: RunSettings,
}

impl CurateConfig {
    pub fn from_yaml_str(text: &str) -> CurateResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| CurateError::config(e.to_string()))
    }

    pub fn load(path: &Path) -> CurateResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CurateError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&text).map_err(|e| match e {
            CurateError::Config { message } => {
                CurateError::config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Loads `path` if it exists; a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> CurateResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> CurateResult<()> {
        self.grader.validate().map_err(CurateError::config)?;
        self.gate.validate().map_err(CurateError::config)?;
        if self.run.concurrency == 0 {
            return Err(CurateError::config("run.concurrency must be at least 1"));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> CurateResult<String> {
        serde_yaml::to_string(self).map_err(|e| CurateError::config(e.to_string()))
    }
}

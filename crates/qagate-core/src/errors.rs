//! Error types for the curation pipeline.

use std::path::PathBuf;
use std::time::Duration;

/// Failures that abort a run. Per-record grading failures never surface
/// here; the grader turns them into fallback verdicts.
#[derive(Debug, thiserror::Error)]
pub enum CurateError {
    /// Input file missing or unreadable.
    #[error("input file not found: {}: {source}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file readable but not a JSON array of records.
    #[error("input file is not a valid record list: {}: {message}", path.display())]
    InputCorrupt { path: PathBuf, message: String },

    /// Configuration file or flags rejected.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Writing an output artifact failed.
    #[error("failed to write {}: {message}", path.display())]
    Output { path: PathBuf, message: String },
}

impl CurateError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type CurateResult<T> = Result<T, CurateError>;

/// Failures of a single call to the grading model.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} request timed out after {timeout:?}")]
    Timeout {
        provider: String,
        timeout: Duration,
    },

    #[error("{provider} API error (status {status}): {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider} network error: {message}")]
    Network { provider: String, message: String },

    /// Endpoint answered but the envelope (not the verdict) was unusable.
    #[error("{provider} returned a malformed response: {message}")]
    Malformed { provider: String, message: String },

    /// The model reported an error inside an otherwise successful response.
    #[error("{provider} model error: {message}")]
    Model { provider: String, message: String },
}

impl ProviderError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Status { .. } => "status",
            Self::Network { .. } => "network",
            Self::Malformed { .. } => "malformed",
            Self::Model { .. } => "model",
        }
    }

    pub(crate) fn network(provider: &str, err: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn malformed(provider: &str, message: impl Into<String>) -> Self {
        Self::Malformed {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Reads the body of a non-2xx response into a `Status` error.
    pub(crate) async fn from_status(provider: &str, resp: reqwest::Response) -> Self {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Self::Status {
            provider: provider.to_string(),
            status,
            body,
        }
    }
}

/// Short classification of an arbitrary provider failure for log fields.
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<ProviderError>()
        .map(ProviderError::kind)
        .unwrap_or("other")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_recovered_through_anyhow() {
        let err: anyhow::Error = ProviderError::Timeout {
            provider: "ollama".into(),
            timeout: Duration::from_secs(30),
        }
        .into();
        assert_eq!(error_kind(&err), "timeout");
        assert_eq!(error_kind(&anyhow::anyhow!("boom")), "other");
    }

    #[test]
    fn status_message_carries_body() {
        let err = ProviderError::Status {
            provider: "openai".into(),
            status: 503,
            body: "overloaded".into(),
        };
        assert_eq!(err.to_string(), "openai API error (status 503): overloaded");
    }
}

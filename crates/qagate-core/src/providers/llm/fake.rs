use super::LlmClient;
use crate::model::LlmResponse;
use async_trait::async_trait;

/// Verdict returned when no fixed response is configured: mid-scale on
/// both axes, which the default gate rejects.
const DEFAULT_RESPONSE: &str = r#"{"accuracy": {"score": 5, "explanation": "fake provider"}, "style": {"score": 5, "explanation": "fake provider"}}"#;

/// Offline client for dry runs; every call returns the same text.
#[derive(Debug)]
pub struct FakeClient {
    model: String,
    fixed_response: Option<String>,
}

impl FakeClient {
    pub fn new(model: String) -> Self {
        Self {
            model,
            fixed_response: None,
        }
    }

    pub fn with_response(mut self, response: String) -> Self {
        self.fixed_response = Some(response);
        self
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<LlmResponse> {
        let text = self
            .fixed_response
            .clone()
            .unwrap_or_else(|| DEFAULT_RESPONSE.to_string());

        Ok(LlmResponse {
            text,
            provider: "fake".to_string(),
            model: self.model.clone(),
            meta: serde_json::json!({}),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

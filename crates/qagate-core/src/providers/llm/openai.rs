use super::LlmClient;
use crate::errors::ProviderError;
use crate::model::LlmResponse;
use async_trait::async_trait;
use serde_json::json;

const PROVIDER: &str = "openai";

pub struct OpenAIClient {
    pub model: String,
    pub endpoint: String,
    pub api_key: String,
    pub temperature: f32,
    pub max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(
        model: String,
        endpoint: String,
        api_key: String,
        temperature: f32,
        max_tokens: u32,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| anyhow::anyhow!("failed to create HTTP client: {}", e))?;
        Ok(Self {
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            temperature,
            max_tokens,
            client,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse> {
        let url = format!("{}/v1/chat/completions", self.endpoint);

        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::network(PROVIDER, e))?;

        if !resp.status().is_success() {
            return Err(ProviderError::from_status(PROVIDER, resp).await.into());
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::malformed(PROVIDER, e.to_string()))?;

        // Parse choices[0].message.content
        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "response missing content"))?
            .to_string();

        Ok(LlmResponse {
            text,
            provider: PROVIDER.to_string(),
            model: self.model.clone(),
            meta: json.get("usage").cloned().unwrap_or_else(|| json!({})),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

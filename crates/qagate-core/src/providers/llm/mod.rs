pub mod fake;
pub mod ollama;
pub mod openai;
pub mod tracing;

use crate::config::{GraderConfig, ProviderKind};
use crate::model::LlmResponse;
use async_trait::async_trait;
use std::sync::Arc;

/// A text-generation endpoint. Implementations that receive the answer in
/// fragments must return the fully concatenated text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse>;

    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}

/// Builds the client described by `cfg`, wrapped in request tracing.
///
/// `api_key` is only consulted for providers that need one.
pub fn build_client(
    cfg: &GraderConfig,
    api_key: Option<String>,
) -> anyhow::Result<Arc<dyn LlmClient>> {
    let endpoint = cfg.effective_endpoint();
    let inner: Arc<dyn LlmClient> = match cfg.provider {
        ProviderKind::Ollama => Arc::new(ollama::OllamaClient::new(
            cfg.model.clone(),
            endpoint.unwrap_or_default(),
            cfg.temperature,
            cfg.max_tokens,
        )?),
        ProviderKind::OpenAi => {
            let key = api_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
                anyhow::anyhow!("grader provider is openai but OPENAI_API_KEY is not set")
            })?;
            Arc::new(openai::OpenAIClient::new(
                cfg.model.clone(),
                endpoint.unwrap_or_default(),
                key,
                cfg.temperature,
                cfg.max_tokens,
            )?)
        }
        ProviderKind::Fake => Arc::new(fake::FakeClient::new(cfg.model.clone())),
    };
    Ok(Arc::new(self::tracing::TracingLlmClient::new(inner)))
}

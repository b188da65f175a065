use crate::errors::error_kind;
use crate::model::LlmResponse;
use crate::providers::llm::LlmClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info_span, Instrument};

/// Wraps a client so every request runs inside an `llm.request` span.
///
/// Prompts and responses are never recorded, only their sizes.
pub struct TracingLlmClient {
    inner: Arc<dyn LlmClient>,
}

impl TracingLlmClient {
    pub fn new(inner: Arc<dyn LlmClient>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl LlmClient for TracingLlmClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse> {
        let span = info_span!(
            "llm.request",
            "llm.provider" = self.inner.provider_name(),
            "llm.model" = self.inner.model_name(),
            "llm.prompt_chars" = prompt.len(),
            "llm.response_chars" = tracing::field::Empty,
            "llm.duration_ms" = tracing::field::Empty,
            "error" = tracing::field::Empty,
            "error.kind" = tracing::field::Empty,
            "error.message" = tracing::field::Empty
        );

        async move {
            let start = std::time::Instant::now();
            let result = self.inner.complete(prompt).await;

            let span = tracing::Span::current();
            span.record("llm.duration_ms", start.elapsed().as_millis() as u64);
            match &result {
                Ok(resp) => {
                    span.record("llm.response_chars", resp.text.len());
                }
                Err(e) => {
                    span.record("error", true);
                    span.record("error.kind", error_kind(e));
                    span.record("error.message", e.to_string().as_str());
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

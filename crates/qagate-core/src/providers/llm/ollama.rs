//! Ollama `/api/generate` client with streamed responses.
//!
//! The endpoint answers with newline-delimited JSON objects, each carrying a
//! `response` fragment. Fragments are concatenated in arrival order and the
//! full text is returned only once the stream ends.

use super::LlmClient;
use crate::errors::ProviderError;
use crate::model::LlmResponse;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const PROVIDER: &str = "ollama";
const USER_AGENT_VALUE: &str = concat!("qagate/", env!("CARGO_PKG_VERSION"));

pub struct OllamaClient {
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
    pub max_tokens: u32,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(
        model: String,
        endpoint: String,
        temperature: f32,
        max_tokens: u32,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to create HTTP client: {}", e))?;
        Ok(Self {
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            temperature,
            max_tokens,
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Reassembles NDJSON lines that may be split across network chunks.
#[derive(Debug, Default)]
pub(crate) struct StreamAccumulator {
    pending: Vec<u8>,
    text: String,
    fragments: usize,
    done: bool,
}

impl StreamAccumulator {
    pub(crate) fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), ProviderError> {
        self.pending.extend_from_slice(bytes);
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.push_line(&line)?;
        }
        Ok(())
    }

    fn push_line(&mut self, line: &[u8]) -> Result<(), ProviderError> {
        let line = std::str::from_utf8(line)
            .map_err(|e| ProviderError::malformed(PROVIDER, format!("non UTF-8 stream: {e}")))?
            .trim();
        if line.is_empty() {
            return Ok(());
        }
        let chunk: GenerateChunk = serde_json::from_str(line)
            .map_err(|e| ProviderError::malformed(PROVIDER, format!("bad stream line: {e}")))?;
        if let Some(message) = chunk.error {
            return Err(ProviderError::Model {
                provider: PROVIDER.to_string(),
                message,
            });
        }
        if let Some(fragment) = chunk.response {
            self.text.push_str(&fragment);
            self.fragments += 1;
        }
        self.done |= chunk.done;
        Ok(())
    }

    /// Flushes a trailing line without newline and returns the full text.
    pub(crate) fn finish(mut self) -> Result<(String, usize, bool), ProviderError> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.push_line(&rest)?;
        }
        Ok((self.text, self.fragments, self.done))
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": true,
            "options": {
                "num_predict": self.max_tokens,
                "temperature": self.temperature,
            },
        });

        let mut resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::network(PROVIDER, e))?;

        if !resp.status().is_success() {
            return Err(ProviderError::from_status(PROVIDER, resp).await.into());
        }

        let mut acc = StreamAccumulator::default();
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| ProviderError::network(PROVIDER, e))?
        {
            acc.push_bytes(&chunk)?;
        }
        let (text, fragments, done) = acc.finish()?;
        if !done {
            return Err(ProviderError::malformed(
                PROVIDER,
                format!("stream ended after {fragments} fragment(s) without a done marker"),
            )
            .into());
        }
        debug!(fragments, chars = text.len(), "ollama stream complete");

        Ok(LlmResponse {
            text,
            provider: PROVIDER.to_string(),
            model: self.model.clone(),
            meta: json!({ "fragments": fragments }),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

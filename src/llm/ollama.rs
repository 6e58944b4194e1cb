//! Ollama API streaming client
//!
//! Endpoint: POST /api/generate with `stream: true`. The daemon answers with
//! newline-delimited JSON chunks; `response` fragments are concatenated until
//! a chunk reports `done`.

use super::retry::RetryManager;
use super::TextGenerator;
use crate::errors::{PredictorError, Result};
use async_trait::async_trait;
use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Ollama streaming client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    retry: RetryManager,
}

impl OllamaClient {
    pub fn with_config(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PredictorError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            retry: RetryManager::new(),
        })
    }

    pub fn with_retry(mut self, retry: RetryManager) -> Self {
        self.retry = retry;
        self
    }

    async fn generate_once(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: true,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PredictorError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let mut stream = response.bytes_stream();
        let mut assembler = ResponseAssembler::default();

        while let Some(chunk) = stream.next().await {
            if assembler.push(&chunk?)? {
                return Ok(assembler.into_text());
            }
        }

        assembler.finish()
    }

    /// Check if the daemon is reachable
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/version", self.base_url);
        matches!(self.client.get(&url).send().await, Ok(r) if r.status().is_success())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_chars = prompt.len(), "Ollama generate");
        self.retry
            .execute_with_retry(|| self.generate_once(prompt))
            .await
    }

    fn provider(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    error: Option<String>,
}

/// Reassembles NDJSON chunks split at arbitrary byte boundaries
#[derive(Debug, Default)]
struct ResponseAssembler {
    buffer: BytesMut,
    text: String,
    done: bool,
}

impl ResponseAssembler {
    /// Feed bytes; returns true once the final chunk has been seen
    fn push(&mut self, bytes: &[u8]) -> Result<bool> {
        self.buffer.extend_from_slice(bytes);

        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line = self.buffer.split_to(newline + 1);
            self.consume_line(&line[..newline])?;
            if self.done {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn consume_line(&mut self, line: &[u8]) -> Result<()> {
        if line.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }

        let chunk: GenerateChunk = serde_json::from_slice(line)?;
        if let Some(error) = chunk.error {
            return Err(PredictorError::GenerationError(error));
        }

        self.text.push_str(&chunk.response);
        self.done = chunk.done;
        Ok(())
    }

    /// Stream ended; accept a trailing unterminated line
    fn finish(mut self) -> Result<String> {
        if !self.buffer.is_empty() {
            let rest = self.buffer.split();
            self.consume_line(&rest)?;
        }

        if !self.done && self.text.is_empty() {
            return Err(PredictorError::GenerationError(
                "Stream ended before any response".to_string(),
            ));
        }

        Ok(self.text)
    }

    fn into_text(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembles_split_chunks() {
        let mut assembler = ResponseAssembler::default();
        assert!(!assembler.push(b"{\"response\":\"Stay \",\"done\":false}\n{\"resp").unwrap());
        assert!(!assembler.push(b"onse\":\"indoors\",\"done\":false}\n").unwrap());
        assert!(assembler.push(b"{\"response\":\".\",\"done\":true}\n").unwrap());
        assert_eq!(assembler.into_text(), "Stay indoors.");
    }

    #[test]
    fn test_trailing_line_without_newline() {
        let mut assembler = ResponseAssembler::default();
        assembler.push(b"{\"response\":\"ok\",\"done\":true}").unwrap();
        assert_eq!(assembler.finish().unwrap(), "ok");
    }

    #[test]
    fn test_error_chunk() {
        let mut assembler = ResponseAssembler::default();
        let result = assembler.push(b"{\"error\":\"model not found\"}\n");
        assert!(matches!(result, Err(PredictorError::GenerationError(_))));
    }

    #[test]
    fn test_empty_stream() {
        assert!(ResponseAssembler::default().finish().is_err());
    }

    #[test]
    fn test_client_with_config() {
        let client = OllamaClient::with_config(
            "http://localhost:11434/",
            "llama2:7b",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.model(), "llama2:7b");
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.provider(), "ollama");
    }
}

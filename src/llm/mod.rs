//! Text generation backends
//!
//! The chat service depends only on [`TextGenerator`]; concrete clients talk
//! to Gemini over REST or to a local Ollama daemon over streaming NDJSON.

pub mod gemini;
pub mod ollama;
pub mod retry;

use crate::cli::config::AiConfig;
use crate::errors::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use retry::RetryManager;

/// Prompt-in, text-out generation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Provider name, e.g. `gemini`
    fn provider(&self) -> &str;

    fn model(&self) -> &str;
}

/// Build the configured generator; `None` means AI is not configured
pub fn build_generator(config: &AiConfig) -> Result<Option<Arc<dyn TextGenerator>>> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let retry = RetryManager::with_config(config.max_retries, 500);

    match config.provider.as_str() {
        "ollama" => {
            let base_url = config
                .base_url
                .as_deref()
                .unwrap_or(ollama::DEFAULT_OLLAMA_URL);
            let client = OllamaClient::with_config(base_url, &config.model, timeout)?
                .with_retry(retry);
            info!(model = %config.model, base_url, "Using Ollama text generator");
            Ok(Some(Arc::new(client)))
        }
        _ => {
            let Some(api_key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
                return Ok(None);
            };
            let base_url = config
                .base_url
                .as_deref()
                .unwrap_or(gemini::DEFAULT_GEMINI_URL);
            let client = GeminiClient::with_config(base_url, &config.model, api_key, timeout)?
                .with_retry(retry);
            info!(model = %config.model, "Using Gemini text generator");
            Ok(Some(Arc::new(client)))
        }
    }
}

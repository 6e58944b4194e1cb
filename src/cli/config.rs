//! Configuration management for the dengue predictor
//!
//! Provides TOML-based configuration with defaults, environment overrides
//! and validation.
//! Location: ~/.dengue-predictor/config.toml

use crate::errors::{PredictorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub model: ModelConfig,
    pub ai: AiConfig,
    pub vector_db: VectorDbConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

/// API server binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Frontend assets served for unmatched paths
    pub static_dir: Option<String>,
}

/// Split topology front process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub backend_url: String,
    pub static_dir: Option<String>,
    pub timeout_secs: u64,
}

/// Trained classifier location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: String,
}

/// Generative AI provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// `gemini` or `ollama`
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

/// Optional case logging store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorDbConfig {
    pub enabled: bool,
    pub url: String,
    pub collection: String,
    /// `hash` or `nomic`
    pub embedder: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub max_history: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: None,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            backend_url: "http://127.0.0.1:8001".to_string(),
            static_dir: Some("frontend".to_string()),
            timeout_secs: 60,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "models/dengue_model.json".to_string(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "http://localhost:6334".to_string(),
            collection: "dengue-cases".to_string(),
            embedder: "hash".to_string(),
            api_key: None,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_history: crate::chat::MAX_HISTORY_ENTRIES,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

const AI_PROVIDERS: [&str; 2] = ["gemini", "ollama"];
const EMBEDDERS: [&str; 2] = ["hash", "nomic"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load from `path`, else the standard location, else defaults, then
    /// apply environment overrides and validate
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut config = match path {
            Some(config_path) => Self::load_from_file(&config_path)?,
            None => Self::load_default()?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a specific file without environment overrides
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PredictorError::ConfigError(format!("Failed to read config: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| PredictorError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    pub fn load_default() -> Result<Self> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }
        Ok(Config::default())
    }

    /// `~/.dengue-predictor/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".dengue-predictor").join("config.toml"))
    }

    /// Overlay credentials and endpoints from the environment
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GOOGLE_API_KEY") {
            self.ai.api_key = Some(key);
        }
        if let Some(path) = non_empty("DENGUE_MODEL_PATH") {
            self.model.path = path;
        }
        if let Some(url) = non_empty("QDRANT_URL") {
            self.vector_db.url = url;
            self.vector_db.enabled = true;
        }
        if let Some(key) = non_empty("QDRANT_API_KEY") {
            self.vector_db.api_key = Some(key);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 || self.gateway.port == 0 {
            return Err(PredictorError::ConfigError(
                "port must be greater than 0".to_string(),
            ));
        }

        if self.model.path.trim().is_empty() {
            return Err(PredictorError::ConfigError(
                "model.path must not be empty".to_string(),
            ));
        }

        if !AI_PROVIDERS.contains(&self.ai.provider.as_str()) {
            return Err(PredictorError::ConfigError(format!(
                "Unknown AI provider: {}",
                self.ai.provider
            )));
        }

        if !EMBEDDERS.contains(&self.vector_db.embedder.as_str()) {
            return Err(PredictorError::ConfigError(format!(
                "Unknown embedder: {}",
                self.vector_db.embedder
            )));
        }

        // History holds user/assistant pairs
        if self.chat.max_history == 0 || self.chat.max_history % 2 != 0 {
            return Err(PredictorError::ConfigError(
                "chat.max_history must be a positive even number".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(PredictorError::ConfigError(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        if self.ai.timeout_secs == 0 || self.gateway.timeout_secs == 0 {
            return Err(PredictorError::ConfigError(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PredictorError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }
        std::fs::write(path, self.to_toml()?)
            .map_err(|e| PredictorError::ConfigError(format!("Failed to write config: {}", e)))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PredictorError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    pub fn model_path(&self) -> PathBuf {
        Self::expand_path(&self.model.path)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

//! Doctor command for deployment diagnostics
//!
//! Checks each collaborator the service degrades without: model file, AI
//! credential and endpoint, vector store, static assets.

use crate::cli::Config;
use crate::model::{Classifier, LogisticRegression};
use colored::Colorize;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor {
    config: Config,
    client: Client,
}

impl Doctor {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        vec![
            self.check_model_file(),
            self.check_ai_credential(),
            self.check_ai_endpoint().await,
            self.check_vector_db().await,
            self.check_static_dir(),
        ]
    }

    fn check_model_file(&self) -> HealthCheck {
        let path = self.config.model_path();
        let status = if !path.exists() {
            HealthStatus::Fail(format!("{} not found", path.display()))
        } else {
            match LogisticRegression::load(&path) {
                Ok(model) => {
                    let info = model.info();
                    tracing::debug!(features = info.features, version = %info.version, "Model file valid");
                    HealthStatus::Pass
                }
                Err(e) => HealthStatus::Fail(e.to_string()),
            }
        };
        HealthCheck::new("Model File", status)
    }

    fn check_ai_credential(&self) -> HealthCheck {
        let ai = &self.config.ai;
        let status = match ai.provider.as_str() {
            "ollama" => HealthStatus::Pass,
            _ if ai.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()) => HealthStatus::Pass,
            _ => HealthStatus::Warn("GOOGLE_API_KEY not set; chat disabled".to_string()),
        };
        HealthCheck::new("AI Credential", status)
    }

    async fn check_ai_endpoint(&self) -> HealthCheck {
        let ai = &self.config.ai;
        let url = match ai.provider.as_str() {
            "ollama" => format!(
                "{}/api/version",
                ai.base_url
                    .as_deref()
                    .unwrap_or(crate::llm::ollama::DEFAULT_OLLAMA_URL)
                    .trim_end_matches('/')
            ),
            _ => ai
                .base_url
                .clone()
                .unwrap_or_else(|| crate::llm::gemini::DEFAULT_GEMINI_URL.to_string()),
        };

        // Any HTTP answer means the endpoint is reachable
        let status = match self.client.get(&url).send().await {
            Ok(_) => HealthStatus::Pass,
            Err(e) => HealthStatus::Warn(format!("{} unreachable: {}", url, e)),
        };
        HealthCheck::new("AI Endpoint", status)
    }

    async fn check_vector_db(&self) -> HealthCheck {
        let vector_db = &self.config.vector_db;
        if !vector_db.enabled {
            return HealthCheck::new(
                "Vector DB",
                HealthStatus::Warn("disabled; cases are not logged".to_string()),
            );
        }

        let status = match crate::cases::connect_store(vector_db).await {
            Ok(Some(store)) => match store.count().await {
                Ok(_) => HealthStatus::Pass,
                Err(e) => HealthStatus::Fail(e.to_string()),
            },
            Ok(None) => HealthStatus::Warn("disabled".to_string()),
            Err(e) => HealthStatus::Fail(e.to_string()),
        };
        HealthCheck::new("Vector DB", status)
    }

    fn check_static_dir(&self) -> HealthCheck {
        let dir = self
            .config
            .server
            .static_dir
            .as_deref()
            .or(self.config.gateway.static_dir.as_deref());

        let status = match dir {
            None => HealthStatus::Pass,
            Some(dir) if Path::new(dir).join("index.html").exists() => HealthStatus::Pass,
            Some(dir) => HealthStatus::Warn(format!("{}/index.html not found", dir)),
        };
        HealthCheck::new("Static Files", status)
    }

    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "Dengue Predictor Diagnostics".bold());
        println!("{:<16} Status", "Check");
        println!("{}", "=".repeat(50));

        for check in checks {
            let message = match &check.status {
                HealthStatus::Pass => "PASS".green(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red(),
            };
            println!("{:<16} {}", check.name, message);
        }

        println!();
    }

    /// No check failed
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}

// src/core/config_manager.rs
//! Unified configuration management - one load path for environment and services

use anyhow::Result;
use serde::Deserialize;

use crate::environment::EnvironmentConfig;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub llm_api_url: String,
    pub llm_model: String,
    pub search_api_url: String,
    pub timeout_seconds: u64,
}

impl ConfigManager {
    /// Load all configurations
    pub fn load() -> Result<Self> {
        let environment = EnvironmentConfig::load()?;
        let service = Self::load_service();

        Ok(Self {
            environment,
            service,
        })
    }

    /// Load service configuration from environment variables
    fn load_service() -> ServiceConfig {
        let llm_api_url =
            std::env::var("GROQ_API_URL").unwrap_or_else(|_| "https://api.groq.com".to_string());

        let llm_model = std::env::var("GROQ_MODEL")
            .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());

        let search_api_url =
            std::env::var("EXA_API_URL").unwrap_or_else(|_| "https://api.exa.ai".to_string());

        ServiceConfig {
            llm_api_url,
            llm_model,
            search_api_url,
            timeout_seconds: 60,
        }
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        self.environment.ensure_directories().await
    }
}

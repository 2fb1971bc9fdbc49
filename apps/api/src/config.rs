use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::{resolve_provider, ProviderConfig};

const DEFAULT_TEMPLATE_PATH: &str = "templates/resume_template.docx";

/// Application configuration loaded from environment variables.
/// Nothing is required; the LLM endpoints stay disabled without a provider key.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Templated package used by export. Missing file means fresh-document export.
    pub template_path: PathBuf,
    pub llm: Option<ProviderConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            template_path: std::env::var("TEMPLATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_TEMPLATE_PATH)),
            llm: resolve_provider(|key| std::env::var(key).ok()),
        })
    }
}

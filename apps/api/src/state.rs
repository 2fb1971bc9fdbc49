use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::optimize::Optimizer;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// LLM-backed optimizer. `None` when no provider key is configured.
    pub optimizer: Option<Arc<dyn Optimizer>>,
    pub store: Arc<dyn ResumeStore>,
}

impl AppState {
    pub fn optimizer(&self) -> Result<&dyn Optimizer, AppError> {
        self.optimizer.as_deref().ok_or(AppError::LlmUnavailable)
    }
}

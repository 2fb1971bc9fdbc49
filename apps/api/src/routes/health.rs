use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and whether the
/// LLM-backed endpoints are enabled.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let llm = state.config.llm.as_ref().map(|llm| {
        json!({
            "provider": format!("{:?}", llm.provider),
            "model": llm.model,
        })
    });
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "llm": llm,
    }))
}

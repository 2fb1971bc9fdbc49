use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::docx::{
    build_template_payload, document_to_markup, generate_document, populate_template, DocxPackage,
};
use crate::errors::AppError;
use crate::matching::{match_phrases, match_tokens, resume_to_text, KeywordMatch};
use crate::models::{OptimizedSections, ParsedResume};
use crate::optimize::apply_overlay;
use crate::parsing::parse_resume_markup;
use crate::state::AppState;
use crate::store::StoredResume;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Deserialize)]
pub struct ParseRequest {
    pub html: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub resume: ParsedResume,
    pub job_text: String,
    /// Phrase-list mode when present.
    pub keywords: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordsRequest {
    pub job_text: String,
}

#[derive(Serialize)]
pub struct KeywordsResponse {
    pub keywords: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub resume: ParsedResume,
    pub job_text: String,
    pub missing_keywords: Option<Vec<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub key: String,
    pub optimized: OptimizedSections,
    pub merged: ParsedResume,
}

#[derive(Deserialize)]
pub struct ExportRequest {
    pub resume: ParsedResume,
    pub optimized: Option<OptimizedSections>,
}

fn require_job_text(job_text: &str) -> Result<&str, AppError> {
    let job_text = job_text.trim();
    if job_text.is_empty() {
        return Err(AppError::Validation("jobText must not be empty".to_string()));
    }
    Ok(job_text)
}

/// POST /api/v1/resume/parse
///
/// Accepts a multipart upload (field `resume`, a .docx package) or JSON
/// `{ "html": "..." }`.
pub async fn handle_parse(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<ParsedResume>, AppError> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let markup = if is_multipart {
        let multipart = Multipart::from_request(req, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        markup_from_upload(multipart).await?
    } else {
        let Json(body) = Json::<ParseRequest>::from_request(req, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        body.html
    };

    let resume = parse_resume_markup(&markup);
    let key = state.store.save_parsed(resume.clone()).await?;
    info!(
        "Parsed resume stored under '{key}': {} education, {} experience, {} projects, {} skills",
        resume.education.len(),
        resume.experience.len(),
        resume.projects.len(),
        resume.skills.len()
    );
    Ok(Json(resume))
}

async fn markup_from_upload(mut multipart: Multipart) -> Result<String, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some("resume") {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        let package = DocxPackage::from_bytes(data.to_vec())?;
        return Ok(document_to_markup(package.document_xml())?);
    }
    Err(AppError::Validation("No resume file provided".to_string()))
}

/// GET /api/v1/resume/:key
pub async fn handle_get_stored(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<StoredResume>, AppError> {
    let stored = state
        .store
        .get(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No stored resume under '{key}'")))?;
    Ok(Json(stored))
}

/// POST /api/v1/resume/compare
pub async fn handle_compare(Json(req): Json<CompareRequest>) -> Result<Json<KeywordMatch>, AppError> {
    let report = match &req.keywords {
        Some(phrases) => match_phrases(&req.resume, phrases),
        None => match_tokens(&req.resume, require_job_text(&req.job_text)?),
    };
    Ok(Json(report))
}

/// POST /api/v1/resume/keywords
pub async fn handle_keywords(
    State(state): State<AppState>,
    Json(req): Json<KeywordsRequest>,
) -> Result<Json<KeywordsResponse>, AppError> {
    let job_text = require_job_text(&req.job_text)?;
    let keywords = state.optimizer()?.extract_keywords(job_text).await?;
    Ok(Json(KeywordsResponse { keywords }))
}

/// POST /api/v1/resume/optimize
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let job_text = require_job_text(&req.job_text)?;
    let optimizer = state.optimizer()?;

    let missing = match req.missing_keywords {
        Some(missing) => missing,
        None => match_tokens(&req.resume, job_text).missing_keywords,
    };

    let optimized = optimizer
        .optimize(&resume_to_text(&req.resume), job_text, &missing)
        .await?;
    let merged = apply_overlay(&req.resume, &optimized);

    let key = state.store.save_parsed(req.resume).await?;
    state.store.save_optimized(&key, optimized.clone()).await?;

    Ok(Json(OptimizeResponse {
        key,
        optimized,
        merged,
    }))
}

/// POST /api/v1/resume/export
///
/// Fills the configured template; any problem with the template falls back
/// to a freshly generated document, so export always returns a package.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let bytes = match export_from_template(&state, &req).await {
        Some(bytes) => {
            info!("Exported resume from template");
            bytes
        }
        None => {
            let resume = match &req.optimized {
                Some(overlay) => apply_overlay(&req.resume, overlay),
                None => req.resume.clone(),
            };
            info!("Exported resume as a generated document");
            generate_document(&resume)?
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"resume.docx\"",
            ),
        ],
        bytes,
    )
        .into_response())
}

async fn export_from_template(state: &AppState, req: &ExportRequest) -> Option<Vec<u8>> {
    let path = &state.config.template_path;
    let template = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Template {} unavailable: {e}", path.display());
            return None;
        }
    };

    let payload = build_template_payload(&req.resume, req.optimized.as_ref());
    match populate_template(&template, &payload) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!("Template {} could not be filled: {e}", path.display());
            None
        }
    }
}

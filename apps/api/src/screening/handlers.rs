//! Axum route handlers for submitting applications.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::ingest::{extract_text, DocumentFormat};
use crate::models::application::ApplicationState;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TextApplicationRequest {
    pub cv_text: String,
    #[serde(default)]
    pub job_key: Option<String>,
    /// Free-form posting text, for roles not in the catalog.
    #[serde(default)]
    pub job_posting: Option<String>,
}

struct CvUpload {
    bytes: Bytes,
    content_type: Option<String>,
    file_name: Option<String>,
}

/// POST /api/v1/applications
///
/// Multipart form: a `cv` file field plus either `job_key` or `job_posting`.
pub async fn handle_upload_application(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApplicationState>, AppError> {
    let limit = state.config.max_upload_bytes;
    let mut job_key = None;
    let mut job_posting = None;
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_key" => {
                job_key = Some(field.text().await.map_err(|e| multipart_error(e, limit))?);
            }
            "job_posting" => {
                job_posting = Some(field.text().await.map_err(|e| multipart_error(e, limit))?);
            }
            "cv" => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
                upload = Some(CvUpload {
                    bytes,
                    content_type,
                    file_name,
                });
            }
            other => debug!("Ignoring multipart field {other:?}"),
        }
    }

    let upload = upload.ok_or_else(|| AppError::Validation("Missing 'cv' file field".into()))?;
    if upload.bytes.len() > limit {
        return Err(AppError::PayloadTooLarge { limit });
    }

    let format =
        DocumentFormat::detect(upload.content_type.as_deref(), upload.file_name.as_deref())?;
    let (job_title, job_text) = resolve_job(&state, job_key.as_deref(), job_posting.as_deref())?;

    let bytes = upload.bytes;
    let size = bytes.len();
    let cv_text = tokio::task::spawn_blocking(move || extract_text(&bytes, format, limit))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    info!(
        "Extracted {} chars from {size}-byte {format} upload",
        cv_text.chars().count()
    );

    evaluate(&state, cv_text, job_title, job_text).await
}

/// POST /api/v1/applications/text
pub async fn handle_text_application(
    State(state): State<AppState>,
    Json(req): Json<TextApplicationRequest>,
) -> Result<Json<ApplicationState>, AppError> {
    let (job_title, job_text) =
        resolve_job(&state, req.job_key.as_deref(), req.job_posting.as_deref())?;
    evaluate(&state, req.cv_text, job_title, job_text).await
}

async fn evaluate(
    state: &AppState,
    cv_text: String,
    job_title: Option<String>,
    job_text: String,
) -> Result<Json<ApplicationState>, AppError> {
    let mut application = ApplicationState::new(cv_text, job_text);
    if let Some(title) = job_title {
        application = application.with_job_title(title);
    }
    let result = state.pipeline.evaluate(application).await?;
    Ok(Json(result))
}

/// Returns the posting title (catalog jobs only) and the text the prompts receive.
fn resolve_job(
    state: &AppState,
    job_key: Option<&str>,
    job_posting: Option<&str>,
) -> Result<(Option<String>, String), AppError> {
    let job_key = job_key.map(str::trim).filter(|k| !k.is_empty());
    let job_posting = job_posting.filter(|p| !p.trim().is_empty());

    match (job_key, job_posting) {
        (Some(_), Some(_)) => Err(AppError::Validation(
            "Provide either 'job_key' or 'job_posting', not both".into(),
        )),
        (Some(key), None) => {
            let posting = state.catalog.get(key)?;
            Ok((Some(posting.title.clone()), posting.to_text()))
        }
        (None, Some(text)) => Ok((None, text.to_string())),
        (None, None) => Err(AppError::Validation(
            "Provide 'job_key' (see /api/v1/jobs) or 'job_posting'".into(),
        )),
    }
}

fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", err.body_text()))
    }
}

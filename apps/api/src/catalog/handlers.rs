//! Axum route handlers for the Job Catalog API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::job::JobPosting;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobSummary {
    pub key: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub experience_level: String,
    pub job_type: String,
    pub salary_range: String,
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    pub key: String,
    #[serde(flatten)]
    pub posting: JobPosting,
    /// The exact text the screening prompts receive.
    pub text: String,
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<Vec<JobSummary>> {
    let jobs = state
        .catalog
        .entries()
        .iter()
        .map(|entry| JobSummary {
            key: entry.key.clone(),
            title: entry.posting.title.clone(),
            company: entry.posting.company.clone(),
            location: entry.posting.location.clone(),
            experience_level: entry.posting.experience_level.clone(),
            job_type: entry.posting.job_type.clone(),
            salary_range: entry.posting.salary_range.clone(),
        })
        .collect();
    Json(jobs)
}

/// GET /api/v1/jobs/:key
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let posting = state.catalog.get(&key)?;
    Ok(Json(JobDetailResponse {
        text: posting.to_text(),
        posting: posting.clone(),
        key,
    }))
}

pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::catalog::handlers as jobs;
use crate::screening::handlers as applications;
use crate::state::AppState;

/// Room for multipart boundaries and the text fields next to the CV file.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(
        state
            .config
            .max_upload_bytes
            .saturating_add(FORM_OVERHEAD_BYTES),
    );

    Router::new()
        .route("/health", get(health::health_handler))
        // Job catalog
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/jobs/:key", get(jobs::handle_get_job))
        // Screening
        .route(
            "/api/v1/applications",
            post(applications::handle_upload_application).layer(body_limit.clone()),
        )
        .route(
            "/api/v1/applications/text",
            post(applications::handle_text_application).layer(body_limit),
        )
        .with_state(state)
}

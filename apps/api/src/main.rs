mod catalog;
mod config;
mod errors;
mod ingest;
mod llm_client;
mod models;
mod routes;
mod screening;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::JobCatalog;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::screening::pipeline::ScreeningPipeline;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing or placeholder API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screening API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::from_config(&config)?;
    if config.llm_startup_check {
        llm.check_connectivity().await?;
        info!("LLM endpoint reachable at {}", config.openai_base_url);
    } else {
        warn!("LLM_STARTUP_CHECK disabled; skipping endpoint check");
    }

    // Load job catalog
    let catalog = match &config.job_catalog_path {
        Some(path) => JobCatalog::from_json_file(path)?,
        None => {
            info!("JOB_CATALOG_PATH not set; using the built-in sample catalog");
            JobCatalog::sample()
        }
    };
    info!("Job catalog ({} postings): {:?}", catalog.len(), catalog.keys());

    let pipeline = ScreeningPipeline::new(Arc::new(llm), config.routing);
    info!(
        "Screening pipeline ready (model: {}, interview >= {}, escalate >= {} for Senior-Level)",
        pipeline.model_name(),
        config.routing.interview_threshold,
        config.routing.escalation_threshold
    );

    // Build app state
    let state = AppState {
        pipeline: Arc::new(pipeline),
        catalog: Arc::new(catalog),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

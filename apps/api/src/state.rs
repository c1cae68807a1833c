use std::sync::Arc;

use crate::catalog::JobCatalog;
use crate::config::Config;
use crate::screening::pipeline::ScreeningPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ScreeningPipeline>,
    pub catalog: Arc<JobCatalog>,
    pub config: Config,
}

#[cfg(test)]
impl AppState {
    /// Sample catalog plus a pipeline backed by the given scripted model.
    pub(crate) fn scripted(
        model: Arc<crate::llm_client::testing::ScriptedModel>,
        config: Config,
    ) -> Self {
        Self {
            pipeline: Arc::new(ScreeningPipeline::new(model, config.routing)),
            catalog: Arc::new(JobCatalog::sample()),
            config,
        }
    }
}

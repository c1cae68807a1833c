// Evaluation pipeline: four model-call steps, a routing decision, one terminal step.
// Model calls go through llm_client::LanguageModel only.

pub mod decision;
pub mod handlers;
pub mod messages;
pub mod pipeline;
pub mod prompts;
pub mod steps;

use thiserror::Error;

/// Input problems that stop an application before the first step runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScreeningError {
    #[error("CV text is empty; nothing to evaluate")]
    EmptyCv,

    #[error("Job posting text is empty")]
    EmptyJobPosting,
}

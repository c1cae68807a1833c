//! Screening pipeline: runs one application through the fixed workflow.
//!
//! Flow: extract name → categorize experience → assess skills → technical score →
//!       route → exactly one of { schedule interview, escalate, reject with feedback }.
//!
//! Once the inputs are non-empty the run cannot fail. Each model-call step either
//! yields its value or a `StepFailure`; on failure the pipeline substitutes the step's
//! fixed fallback and records the step in `degraded_steps`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::llm_client::LanguageModel;
use crate::models::application::{
    ApplicationState, Decision, DegradedStep, ExperienceLevel, PipelineStep, SkillMatch,
};
use crate::screening::decision::RoutingPolicy;
use crate::screening::messages::{
    escalation_message, interview_message, rejection_fallback_message, rejection_message,
    FALLBACK_RECOMMENDATIONS,
};
use crate::screening::steps::{self, RejectionContext, StepFailure};
use crate::screening::ScreeningError;

pub const FALLBACK_CANDIDATE_NAME: &str = "Unknown Candidate";
pub const FALLBACK_EXPERIENCE: ExperienceLevel = ExperienceLevel::MidLevel;
pub const FALLBACK_SKILL_MATCH: SkillMatch = SkillMatch::PartialMatch;
pub const FALLBACK_TECHNICAL_SCORE: &str = "5";

/// Stateless between runs; safe to share across concurrent requests.
pub struct ScreeningPipeline {
    llm: Arc<dyn LanguageModel>,
    policy: RoutingPolicy,
}

impl ScreeningPipeline {
    pub fn new(llm: Arc<dyn LanguageModel>, policy: RoutingPolicy) -> Self {
        Self { llm, policy }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Runs every step on a fresh application state and returns the completed record.
    pub async fn evaluate(
        &self,
        mut state: ApplicationState,
    ) -> Result<ApplicationState, ScreeningError> {
        if state.cv_text.trim().is_empty() {
            return Err(ScreeningError::EmptyCv);
        }
        if state.job_posting.trim().is_empty() {
            return Err(ScreeningError::EmptyJobPosting);
        }

        let llm = self.llm.as_ref();
        info!("Screening application {}", state.application_id);

        let outcome = steps::extract_candidate_name(llm, &state.cv_text).await;
        let candidate_name = settle(
            &mut state,
            PipelineStep::ExtractCandidateName,
            outcome,
            || FALLBACK_CANDIDATE_NAME.to_string(),
        );
        state.candidate_name = Some(candidate_name.clone());

        let outcome = steps::categorize_experience(llm, &state.cv_text, &state.job_posting).await;
        let experience = settle(
            &mut state,
            PipelineStep::CategorizeExperience,
            outcome,
            || FALLBACK_EXPERIENCE,
        );
        state.experience_level = Some(experience);

        let outcome = steps::assess_skill_match(llm, &state.cv_text, &state.job_posting).await;
        let skill_match = settle(
            &mut state,
            PipelineStep::AssessSkillMatch,
            outcome,
            || FALLBACK_SKILL_MATCH,
        );
        state.skill_match = Some(skill_match);

        let outcome =
            steps::evaluate_technical(llm, &state.cv_text, experience, skill_match).await;
        let technical_score = settle(
            &mut state,
            PipelineStep::TechnicalEvaluation,
            outcome,
            || FALLBACK_TECHNICAL_SCORE.to_string(),
        );
        state.technical_score = Some(technical_score.clone());

        let decision = self.policy.route(&technical_score, experience);
        state.decision = Some(decision);

        match decision {
            Decision::ScheduleInterview => {
                state.response = Some(interview_message(&candidate_name));
            }
            Decision::Escalate => {
                state.response = Some(escalation_message(&candidate_name));
            }
            Decision::RejectWithFeedback => {
                let ctx = RejectionContext {
                    candidate_name: &candidate_name,
                    experience_level: experience,
                    skill_match,
                    technical_score: &technical_score,
                    job_posting: &state.job_posting,
                };
                let (response, recommendations) = match steps::recommend_learning(llm, ctx).await
                {
                    Ok(recommendations) => (rejection_message(&candidate_name), recommendations),
                    Err(failure) => {
                        record_degraded(&mut state, PipelineStep::RejectWithFeedback, &failure);
                        (
                            rejection_fallback_message(&candidate_name),
                            FALLBACK_RECOMMENDATIONS.to_string(),
                        )
                    }
                };
                state.response = Some(response);
                state.learning_recommendations = Some(recommendations);
            }
        }

        info!(
            "Application {} routed to {:?} (score={}, experience={}, skills={}, degraded_steps={})",
            state.application_id,
            decision,
            technical_score,
            experience,
            skill_match,
            state.degraded_steps.len()
        );

        Ok(state)
    }
}

/// Takes the step's value, or records the failure and returns the fallback.
fn settle<T>(
    state: &mut ApplicationState,
    step: PipelineStep,
    outcome: Result<T, StepFailure>,
    fallback: impl FnOnce() -> T,
) -> T {
    match outcome {
        Ok(value) => value,
        Err(failure) => {
            record_degraded(state, step, &failure);
            fallback()
        }
    }
}

fn record_degraded(state: &mut ApplicationState, step: PipelineStep, failure: &StepFailure) {
    debug_assert!(!state.is_degraded(step), "{step:?} recorded twice");
    warn!(
        "Application {}: step {:?} fell back to its default: {}",
        state.application_id, step, failure
    );
    state.degraded_steps.push(DegradedStep {
        step,
        reason: failure.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::JobCatalog;
    use crate::llm_client::testing::{ScriptedModel, ScriptedReply};

    fn pipeline(model: Arc<ScriptedModel>) -> ScreeningPipeline {
        ScreeningPipeline::new(model, RoutingPolicy::default())
    }

    fn ml_engineer_text() -> String {
        JobCatalog::sample()
            .get("Machine Learning Engineer")
            .unwrap()
            .to_text()
    }

    #[tokio::test]
    async fn test_strong_senior_candidate_gets_interview() {
        let model = Arc::new(ScriptedModel::with_texts([
            "Jane Doe",
            "Senior-Level",
            "Strong Match",
            "9",
        ]));
        let state = ApplicationState::new("Jane Doe, 8 years ML experience", ml_engineer_text());

        let result = pipeline(model.clone()).evaluate(state).await.unwrap();

        assert_eq!(result.candidate_name.as_deref(), Some("Jane Doe"));
        assert_eq!(result.experience_level, Some(ExperienceLevel::SeniorLevel));
        assert_eq!(result.skill_match, Some(SkillMatch::StrongMatch));
        assert_eq!(result.technical_score.as_deref(), Some("9"));
        assert_eq!(result.decision, Some(Decision::ScheduleInterview));
        let response = result.response.unwrap();
        assert!(response.contains("Congratulations"));
        assert!(response.contains("Jane Doe"));
        assert!(result.learning_recommendations.is_none());
        assert!(result.degraded_steps.is_empty());

        // Interview is synthesized locally: exactly four model calls.
        let prompts = model.prompts();
        assert_eq!(prompts.len(), 4);
        assert_eq!(model.remaining(), 0);
        assert!(prompts[0].contains("Jane Doe, 8 years ML experience"));
        assert!(prompts[1].contains("Senior Machine Learning Engineer"));
    }

    #[tokio::test]
    async fn test_senior_borderline_candidate_escalates() {
        let model = Arc::new(ScriptedModel::with_texts([
            "John Smith",
            "Senior-Level",
            "Partial Match",
            "6.5",
        ]));
        let state = ApplicationState::new("John Smith, staff engineer", ml_engineer_text());

        let result = pipeline(model.clone()).evaluate(state).await.unwrap();

        assert_eq!(result.decision, Some(Decision::Escalate));
        let response = result.response.unwrap();
        assert!(response.contains("forwarded to our senior recruitment team"));
        assert!(response.contains("John Smith"));
        assert!(result.learning_recommendations.is_none());
        assert_eq!(model.prompts().len(), 4);
    }

    #[tokio::test]
    async fn test_low_score_rejects_with_recommendations() {
        let model = Arc::new(ScriptedModel::with_texts([
            "Sam Lee",
            "Mid-Level",
            "No Match",
            "3",
            "Study linear algebra and ship a small PyTorch project.",
        ]));
        let state = ApplicationState::new("Sam Lee, web developer", ml_engineer_text());

        let result = pipeline(model.clone()).evaluate(state).await.unwrap();

        assert_eq!(result.decision, Some(Decision::RejectWithFeedback));
        let response = result.response.unwrap();
        assert!(!response.contains("Congratulations"));
        assert!(!response.contains("forwarded"));
        assert!(response.contains("we believe in your potential"));
        assert_eq!(
            result.learning_recommendations.as_deref(),
            Some("Study linear algebra and ship a small PyTorch project.")
        );
        assert!(result.degraded_steps.is_empty());

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 5);
        assert!(prompts[4].contains("Candidate: Sam Lee"));
        assert!(prompts[4].contains("Score: 3"));
    }

    #[tokio::test]
    async fn test_technical_transport_error_falls_back_to_five() {
        let model = Arc::new(ScriptedModel::new([
            ScriptedReply::text("Ana Ruiz"),
            ScriptedReply::text("Mid-Level"),
            ScriptedReply::text("Strong Match"),
            ScriptedReply::Status(502),
            ScriptedReply::text("Practice system design."),
        ]));
        let state = ApplicationState::new("Ana Ruiz CV", ml_engineer_text());

        let result = pipeline(model).evaluate(state).await.unwrap();

        assert_eq!(result.technical_score.as_deref(), Some("5"));
        assert_eq!(result.decision, Some(Decision::RejectWithFeedback));
        assert!(result.is_degraded(PipelineStep::TechnicalEvaluation));
        assert_eq!(result.degraded_steps.len(), 1);
        assert!(result.degraded_steps[0].reason.contains("502"));
        assert_eq!(
            result.learning_recommendations.as_deref(),
            Some("Practice system design.")
        );
    }

    #[tokio::test]
    async fn test_every_call_failing_still_produces_a_decision() {
        let model = Arc::new(ScriptedModel::default());
        let state = ApplicationState::new("some cv", "some job");

        let result = pipeline(model.clone()).evaluate(state).await.unwrap();

        assert_eq!(result.candidate_name.as_deref(), Some(FALLBACK_CANDIDATE_NAME));
        assert_eq!(result.experience_level, Some(FALLBACK_EXPERIENCE));
        assert_eq!(result.skill_match, Some(FALLBACK_SKILL_MATCH));
        assert_eq!(result.technical_score.as_deref(), Some(FALLBACK_TECHNICAL_SCORE));
        assert_eq!(result.decision, Some(Decision::RejectWithFeedback));
        assert_eq!(
            result.response.as_deref(),
            Some("Thank you for your interest, Unknown Candidate. Please continue developing your skills.")
        );
        assert_eq!(
            result.learning_recommendations.as_deref(),
            Some(FALLBACK_RECOMMENDATIONS)
        );

        let degraded: Vec<PipelineStep> = result.degraded_steps.iter().map(|d| d.step).collect();
        assert_eq!(
            degraded,
            vec![
                PipelineStep::ExtractCandidateName,
                PipelineStep::CategorizeExperience,
                PipelineStep::AssessSkillMatch,
                PipelineStep::TechnicalEvaluation,
                PipelineStep::RejectWithFeedback,
            ]
        );
        assert_eq!(model.prompts().len(), 5);
    }

    #[tokio::test]
    async fn test_unrecognized_labels_use_fallbacks() {
        let model = Arc::new(ScriptedModel::with_texts([
            "Kim Park",
            "hard to say",
            "maybe?",
            "8",
        ]));
        let state = ApplicationState::new("Kim Park CV", "job");

        let result = pipeline(model).evaluate(state).await.unwrap();

        assert_eq!(result.experience_level, Some(ExperienceLevel::MidLevel));
        assert_eq!(result.skill_match, Some(SkillMatch::PartialMatch));
        assert_eq!(result.decision, Some(Decision::ScheduleInterview));
        assert!(result.is_degraded(PipelineStep::CategorizeExperience));
        assert!(result.is_degraded(PipelineStep::AssessSkillMatch));
        assert!(!result.is_degraded(PipelineStep::TechnicalEvaluation));
    }

    #[tokio::test]
    async fn test_fallback_experience_feeds_technical_prompt() {
        let model = Arc::new(ScriptedModel::new([
            ScriptedReply::text("Kim Park"),
            ScriptedReply::Empty,
            ScriptedReply::text("Strong Match"),
            ScriptedReply::text("7"),
        ]));
        let state = ApplicationState::new("Kim Park CV", "job");

        pipeline(model.clone()).evaluate(state).await.unwrap();

        let prompts = model.prompts();
        assert!(prompts[3].contains("Experience: Mid-Level"));
    }

    #[tokio::test]
    async fn test_empty_cv_is_rejected_before_any_call() {
        let model = Arc::new(ScriptedModel::with_texts(["unused"]));
        let err = pipeline(model.clone())
            .evaluate(ApplicationState::new("  \n ", "job"))
            .await
            .unwrap_err();
        assert_eq!(err, ScreeningError::EmptyCv);
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_empty_job_posting_is_rejected() {
        let model = Arc::new(ScriptedModel::with_texts(["unused"]));
        let err = pipeline(model)
            .evaluate(ApplicationState::new("cv", ""))
            .await
            .unwrap_err();
        assert_eq!(err, ScreeningError::EmptyJobPosting);
    }

    #[tokio::test]
    async fn test_inputs_and_identity_preserved() {
        let model = Arc::new(ScriptedModel::with_texts(["Lee", "Entry-Level", "No Match", "9"]));
        let state = ApplicationState::new("Lee CV", "job").with_job_title("ML Engineer");
        let id = state.application_id;

        let result = pipeline(model).evaluate(state).await.unwrap();

        assert_eq!(result.application_id, id);
        assert_eq!(result.cv_text, "Lee CV");
        assert_eq!(result.job_posting, "job");
        assert_eq!(result.job_title.as_deref(), Some("ML Engineer"));
    }

    #[tokio::test]
    async fn test_custom_policy_is_applied() {
        let model = Arc::new(ScriptedModel::with_texts([
            "Lee",
            "Senior-Level",
            "Strong Match",
            "7.5",
        ]));
        let strict = ScreeningPipeline::new(
            model,
            RoutingPolicy {
                interview_threshold: 8.0,
                escalation_threshold: 7.0,
            },
        );
        let result = strict
            .evaluate(ApplicationState::new("Lee CV", "job"))
            .await
            .unwrap();
        assert_eq!(result.decision, Some(Decision::Escalate));
    }
}

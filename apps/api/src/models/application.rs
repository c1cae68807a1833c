use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Experience band assigned by the categorization step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "Entry-Level")]
    EntryLevel,
    #[serde(rename = "Mid-Level")]
    MidLevel,
    #[serde(rename = "Senior-Level")]
    SeniorLevel,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::EntryLevel,
        ExperienceLevel::MidLevel,
        ExperienceLevel::SeniorLevel,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::EntryLevel => "Entry-Level",
            ExperienceLevel::MidLevel => "Mid-Level",
            ExperienceLevel::SeniorLevel => "Senior-Level",
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            ExperienceLevel::EntryLevel => "entry",
            ExperienceLevel::MidLevel => "mid",
            ExperienceLevel::SeniorLevel => "senior",
        }
    }

    /// Finds the label in free model text. The earliest keyword wins.
    pub fn from_completion(text: &str) -> Option<Self> {
        earliest_match(&text.to_lowercase(), &Self::ALL, |level| level.keyword())
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Verdict of the skill-match step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillMatch {
    #[serde(rename = "Strong Match")]
    StrongMatch,
    #[serde(rename = "Partial Match")]
    PartialMatch,
    #[serde(rename = "No Match")]
    NoMatch,
}

impl SkillMatch {
    pub const ALL: [SkillMatch; 3] = [
        SkillMatch::StrongMatch,
        SkillMatch::PartialMatch,
        SkillMatch::NoMatch,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SkillMatch::StrongMatch => "Strong Match",
            SkillMatch::PartialMatch => "Partial Match",
            SkillMatch::NoMatch => "No Match",
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            SkillMatch::StrongMatch => "strong",
            SkillMatch::PartialMatch => "partial",
            SkillMatch::NoMatch => "no match",
        }
    }

    /// Finds the verdict in free model text. The earliest keyword wins.
    pub fn from_completion(text: &str) -> Option<Self> {
        let normalized = text.to_lowercase().replace(['-', '_'], " ");
        earliest_match(&normalized, &Self::ALL, |verdict| verdict.keyword())
    }
}

impl fmt::Display for SkillMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn earliest_match<T: Copy>(
    haystack: &str,
    options: &[T],
    keyword: impl Fn(T) -> &'static str,
) -> Option<T> {
    options
        .iter()
        .filter_map(|&option| haystack.find(keyword(option)).map(|pos| (pos, option)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, option)| option)
}

/// Terminal step chosen by the decision router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    ScheduleInterview,
    Escalate,
    RejectWithFeedback,
}

/// Pipeline steps that call the model and can therefore degrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    ExtractCandidateName,
    CategorizeExperience,
    AssessSkillMatch,
    TechnicalEvaluation,
    RejectWithFeedback,
}

/// Record of a step whose fallback value replaced the model's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedStep {
    pub step: PipelineStep,
    pub reason: String,
}

/// Per-application record that accumulates every field the pipeline produces.
///
/// Fields start empty and are filled in step order. Nothing is stored once the
/// record has been returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationState {
    pub application_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    pub job_title: Option<String>,
    pub cv_text: String,
    pub job_posting: String,
    pub candidate_name: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub skill_match: Option<SkillMatch>,
    /// Kept as the model's numeric string; the router parses it.
    pub technical_score: Option<String>,
    pub decision: Option<Decision>,
    pub response: Option<String>,
    pub learning_recommendations: Option<String>,
    pub degraded_steps: Vec<DegradedStep>,
}

impl ApplicationState {
    pub fn new(cv_text: impl Into<String>, job_posting: impl Into<String>) -> Self {
        Self {
            application_id: Uuid::new_v4(),
            evaluated_at: Utc::now(),
            job_title: None,
            cv_text: cv_text.into(),
            job_posting: job_posting.into(),
            candidate_name: None,
            experience_level: None,
            skill_match: None,
            technical_score: None,
            decision: None,
            response: None,
            learning_recommendations: None,
            degraded_steps: Vec::new(),
        }
    }

    pub fn with_job_title(mut self, title: impl Into<String>) -> Self {
        self.job_title = Some(title.into());
        self
    }

    pub fn is_degraded(&self, step: PipelineStep) -> bool {
        self.degraded_steps.iter().any(|d| d.step == step)
    }
}

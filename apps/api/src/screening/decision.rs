//! Decision Router: picks the terminal step from the accumulated evaluation.

use crate::models::application::{Decision, ExperienceLevel};

/// Score thresholds for the routing decision. Both comparisons are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingPolicy {
    pub interview_threshold: f64,
    pub escalation_threshold: f64,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self {
            interview_threshold: 7.0,
            escalation_threshold: 6.0,
        }
    }
}

impl RoutingPolicy {
    /// Routes an application. Evaluated in order:
    /// 1. unparseable score → reject
    /// 2. score ≥ interview threshold → interview
    /// 3. Senior-Level and score ≥ escalation threshold → escalate
    /// 4. otherwise → reject
    pub fn route(&self, technical_score: &str, experience: ExperienceLevel) -> Decision {
        let Ok(score) = technical_score.trim().parse::<f64>() else {
            return Decision::RejectWithFeedback;
        };

        if score >= self.interview_threshold {
            Decision::ScheduleInterview
        } else if experience == ExperienceLevel::SeniorLevel && score >= self.escalation_threshold
        {
            Decision::Escalate
        } else {
            Decision::RejectWithFeedback
        }
    }
}

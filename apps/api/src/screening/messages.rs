// Candidate-facing text for the terminal steps. No model calls here.

pub const FALLBACK_RECOMMENDATIONS: &str =
    "Focus on building relevant experience and skills for this role.";

pub fn interview_message(candidate_name: &str) -> String {
    format!(
        "Congratulations {candidate_name}! You have been selected for an interview. \
         Our HR team will contact you within 2 business days."
    )
}

pub fn escalation_message(candidate_name: &str) -> String {
    format!(
        "Hello {candidate_name}, your application shows strong potential and has been \
         forwarded to our senior recruitment team for detailed review."
    )
}

pub fn rejection_message(candidate_name: &str) -> String {
    format!(
        "Thank you for your interest, {candidate_name}. While you weren't selected for \
         this position, we believe in your potential."
    )
}

/// Used when the recommendations call failed and only the generic advice is available.
pub fn rejection_fallback_message(candidate_name: &str) -> String {
    format!(
        "Thank you for your interest, {candidate_name}. Please continue developing your skills."
    )
}

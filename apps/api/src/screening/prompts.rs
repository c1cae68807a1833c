// All prompt templates for the screening steps.
// Placeholders are filled with llm_client::prompts::render.

pub const CANDIDATE_NAME_PROMPT: &str =
    "Extract the candidate's name from this CV. Return only the name: {cv_text}";

pub const EXPERIENCE_PROMPT: &str = "\
Categorize experience level based on CV and job posting.
Reply ONLY with: 'Entry-Level', 'Mid-Level', or 'Senior-Level'

CV: {cv_text}
Job: {job_posting}";

pub const SKILL_MATCH_PROMPT: &str = "\
Assess skill match between CV and job requirements.
Reply ONLY with: 'Strong Match', 'Partial Match', or 'No Match'

CV: {cv_text}
Job: {job_posting}";

pub const TECHNICAL_SCORE_PROMPT: &str = "\
Rate technical competency 1-10. Reply ONLY with the number.

CV: {cv_text}
Experience: {experience_level}
Skills: {skill_match}";

pub const LEARNING_RECOMMENDATIONS_PROMPT: &str = "\
Create learning recommendations for this rejected candidate.
Be encouraging and specific about courses, projects, and skills to develop.

Candidate: {candidate_name}
Experience: {experience_level}
Skills: {skill_match}
Score: {technical_score}
Job: {job_posting}";

/// Character budgets for text interpolated into prompts.
pub const NAME_CV_CHARS: usize = 1000;
pub const CV_EXCERPT_CHARS: usize = 1500;
pub const JOB_EXCERPT_CHARS: usize = 1000;

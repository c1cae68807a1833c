//! The model-call steps of the screening pipeline.
//!
//! Each step sends one prompt and interprets the completion. A step never picks a
//! fallback itself: it returns `StepFailure` and the pipeline decides what to use instead.

use thiserror::Error;

use crate::llm_client::prompts::{
    render, truncate_chars, BARE_ANSWER_INSTRUCTION, NO_SIGNATURE_INSTRUCTION,
};
use crate::llm_client::{LanguageModel, LlmError};
use crate::models::application::{ExperienceLevel, SkillMatch};
use crate::screening::prompts::{
    CANDIDATE_NAME_PROMPT, CV_EXCERPT_CHARS, EXPERIENCE_PROMPT, JOB_EXCERPT_CHARS,
    LEARNING_RECOMMENDATIONS_PROMPT, NAME_CV_CHARS, SKILL_MATCH_PROMPT, TECHNICAL_SCORE_PROMPT,
};

#[derive(Debug, Error)]
pub enum StepFailure {
    #[error("model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("unrecognized model output: {0:?}")]
    Unrecognized(String),
}

/// Everything the rejection step tells the model about the candidate.
#[derive(Debug, Clone, Copy)]
pub struct RejectionContext<'a> {
    pub candidate_name: &'a str,
    pub experience_level: ExperienceLevel,
    pub skill_match: SkillMatch,
    pub technical_score: &'a str,
    pub job_posting: &'a str,
}

pub async fn extract_candidate_name(
    llm: &dyn LanguageModel,
    cv_text: &str,
) -> Result<String, StepFailure> {
    let prompt = with_instruction(
        render(
            CANDIDATE_NAME_PROMPT,
            &[("cv_text", truncate_chars(cv_text, NAME_CV_CHARS))],
        ),
        BARE_ANSWER_INSTRUCTION,
    );
    let completion = complete(llm, &prompt).await?;
    clean_name(&completion).ok_or(StepFailure::Unrecognized(completion))
}

pub async fn categorize_experience(
    llm: &dyn LanguageModel,
    cv_text: &str,
    job_posting: &str,
) -> Result<ExperienceLevel, StepFailure> {
    let prompt = with_instruction(
        render(EXPERIENCE_PROMPT, &excerpts(cv_text, job_posting)),
        BARE_ANSWER_INSTRUCTION,
    );
    let completion = complete(llm, &prompt).await?;
    ExperienceLevel::from_completion(&completion).ok_or(StepFailure::Unrecognized(completion))
}

pub async fn assess_skill_match(
    llm: &dyn LanguageModel,
    cv_text: &str,
    job_posting: &str,
) -> Result<SkillMatch, StepFailure> {
    let prompt = with_instruction(
        render(SKILL_MATCH_PROMPT, &excerpts(cv_text, job_posting)),
        BARE_ANSWER_INSTRUCTION,
    );
    let completion = complete(llm, &prompt).await?;
    SkillMatch::from_completion(&completion).ok_or(StepFailure::Unrecognized(completion))
}

/// Returns the score as the numeric string found in the completion.
/// The 1–10 range is requested, not enforced.
pub async fn evaluate_technical(
    llm: &dyn LanguageModel,
    cv_text: &str,
    experience_level: ExperienceLevel,
    skill_match: SkillMatch,
) -> Result<String, StepFailure> {
    let prompt = with_instruction(
        render(
            TECHNICAL_SCORE_PROMPT,
            &[
                ("cv_text", truncate_chars(cv_text, CV_EXCERPT_CHARS)),
                ("experience_level", experience_level.label()),
                ("skill_match", skill_match.label()),
            ],
        ),
        BARE_ANSWER_INSTRUCTION,
    );
    let completion = complete(llm, &prompt).await?;
    match first_number(&completion) {
        Some(score) => Ok(score.to_string()),
        None => Err(StepFailure::Unrecognized(completion)),
    }
}

pub async fn recommend_learning(
    llm: &dyn LanguageModel,
    ctx: RejectionContext<'_>,
) -> Result<String, StepFailure> {
    let prompt = with_instruction(
        render(
            LEARNING_RECOMMENDATIONS_PROMPT,
            &[
                ("candidate_name", ctx.candidate_name),
                ("experience_level", ctx.experience_level.label()),
                ("skill_match", ctx.skill_match.label()),
                ("technical_score", ctx.technical_score),
                (
                    "job_posting",
                    truncate_chars(ctx.job_posting, JOB_EXCERPT_CHARS),
                ),
            ],
        ),
        NO_SIGNATURE_INSTRUCTION,
    );
    let completion = complete(llm, &prompt).await?;
    Ok(completion.trim().to_string())
}

/// One model call; a blank completion counts as a failed call.
async fn complete(llm: &dyn LanguageModel, prompt: &str) -> Result<String, StepFailure> {
    let completion = llm.complete(prompt).await?;
    if completion.trim().is_empty() {
        return Err(LlmError::EmptyContent.into());
    }
    Ok(completion)
}

fn excerpts<'a>(cv_text: &'a str, job_posting: &'a str) -> [(&'static str, &'a str); 2] {
    [
        ("cv_text", truncate_chars(cv_text, CV_EXCERPT_CHARS)),
        ("job_posting", truncate_chars(job_posting, JOB_EXCERPT_CHARS)),
    ]
}

fn with_instruction(prompt: String, instruction: &str) -> String {
    format!("{prompt}\n\n{instruction}")
}

/// First non-empty line, stripped of quotes and markdown emphasis.
fn clean_name(completion: &str) -> Option<String> {
    completion
        .lines()
        .map(|line| {
            line.trim()
                .trim_matches(|c: char| matches!(c, '"' | '\'' | '*' | '`'))
        })
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// The score stated in the completion. A number alone on its line wins; otherwise the
/// first number that is not a range bound (`1-10`) or a denominator (`/10`), falling back
/// to the first number of any kind.
/// `"Score: 8/10"` → `"8"`, `"On a 1-10 scale: 8"` → `"8"`, `"-3"` → `"-3"`.
fn first_number(text: &str) -> Option<&str> {
    let standalone = text
        .lines()
        .map(|line| line.trim().trim_end_matches('.'))
        .find(|line| is_number(line));
    if standalone.is_some() {
        return standalone;
    }

    let spans = number_spans(text);
    spans
        .iter()
        .find(|span| !span.in_range_or_ratio)
        .or(spans.first())
        .map(|span| &text[span.start..span.end])
}

struct NumberSpan {
    start: usize,
    end: usize,
    in_range_or_ratio: bool,
}

fn is_number(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.map_or(true, all_digits)
}

fn number_spans(text: &str) -> Vec<NumberSpan> {
    let bytes = text.as_bytes();
    let is_digit_at = |idx: usize| bytes.get(idx).is_some_and(u8::is_ascii_digit);
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let mut start = i;
        let mut end = i;
        while is_digit_at(end) {
            end += 1;
        }
        if bytes.get(end) == Some(&b'.') && is_digit_at(end + 1) {
            end += 1;
            while is_digit_at(end) {
                end += 1;
            }
        }

        let dash_before = start > 0 && bytes[start - 1] == b'-';
        let range_end = dash_before && start > 1 && bytes[start - 2].is_ascii_digit();
        let range_start = bytes.get(end) == Some(&b'-') && is_digit_at(end + 1);
        let denominator = start > 0 && bytes[start - 1] == b'/';
        let signed =
            dash_before && !(start > 1 && bytes[start - 2].is_ascii_alphanumeric());
        if signed {
            start -= 1;
        }

        spans.push(NumberSpan {
            start,
            end,
            in_range_or_ratio: range_start || range_end || denominator,
        });
        i = end;
    }
    spans
}

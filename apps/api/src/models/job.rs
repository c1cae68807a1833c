use std::fmt;

use serde::{Deserialize, Serialize};

/// A job posting from the catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub experience_level: String,
    pub skills_required: Vec<String>,
    pub location: String,
    pub salary_range: String,
    pub job_type: String,
}

impl JobPosting {
    /// Flattens the posting into the plain-text form the screening prompts receive.
    pub fn to_text(&self) -> String {
        format!(
            "Title: {}\nCompany: {}\nDescription: {}\nRequirements: {}",
            self.title,
            self.company,
            self.description,
            self.requirements.join(" ")
        )
    }
}

impl fmt::Display for JobPosting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.title, self.company)
    }
}

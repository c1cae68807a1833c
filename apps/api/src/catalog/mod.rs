//! Job Catalog: the static set of postings applicants can apply to.
//!
//! Loaded once at startup and shared read-only through `AppState`.

pub mod handlers;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::job::JobPosting;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Job '{0}' not found")]
    UnknownJob(String),

    #[error("Failed to read job catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid job catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid job catalog: {0}")]
    Invalid(String),
}

/// On-disk catalog entry: a posting plus the key applicants select it by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub key: String,
    #[serde(flatten)]
    pub posting: JobPosting,
}

#[derive(Debug, Clone)]
pub struct JobCatalog {
    entries: Vec<CatalogEntry>,
}

impl JobCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Invalid("catalog has no postings".to_string()));
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.key.trim().is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "posting '{}' has a blank key",
                    entry.posting.title
                )));
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate key '{}'",
                    entry.key
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Loads a catalog from a JSON array of postings, each with a `key` field.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&raw)?;
        let catalog = Self::new(entries)?;
        info!(
            "Loaded {} job postings from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn get(&self, key: &str) -> Result<&JobPosting, CatalogError> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.posting)
            .ok_or_else(|| CatalogError::UnknownJob(key.to_string()))
    }

    /// Keys in catalog order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The three built-in sample postings.
    pub fn sample() -> Self {
        Self {
            entries: vec![
                CatalogEntry {
                    key: "Machine Learning Engineer".to_string(),
                    posting: JobPosting {
                        title: "Senior Machine Learning Engineer".to_string(),
                        company: "TechCorp AI".to_string(),
                        description: "We are seeking a Senior Machine Learning Engineer to join our AI research team and develop cutting-edge AI solutions.".to_string(),
                        requirements: strings(&[
                            "5+ years of experience in machine learning and data science",
                            "Strong proficiency in Python, TensorFlow, PyTorch",
                            "Experience with deep learning, NLP, computer vision",
                            "Knowledge of MLOps, model deployment, and scaling",
                            "Master's degree in Computer Science, Mathematics, or related field",
                            "Experience with cloud platforms (AWS, GCP, Azure)",
                            "Strong problem-solving and analytical skills",
                        ]),
                        experience_level: "Senior-Level".to_string(),
                        skills_required: strings(&[
                            "Python",
                            "TensorFlow",
                            "PyTorch",
                            "Machine Learning",
                            "Deep Learning",
                            "MLOps",
                        ]),
                        location: "San Francisco, CA / Remote".to_string(),
                        salary_range: "$120,000 - $180,000".to_string(),
                        job_type: "Full-time".to_string(),
                    },
                },
                CatalogEntry {
                    key: "Django Developer".to_string(),
                    posting: JobPosting {
                        title: "Full Stack Django Developer".to_string(),
                        company: "WebSolutions Inc".to_string(),
                        description: "Join our development team to build scalable web applications using Django framework.".to_string(),
                        requirements: strings(&[
                            "3+ years of experience with Django and Python",
                            "Strong knowledge of HTML, CSS, JavaScript",
                            "Experience with PostgreSQL/MySQL databases",
                            "Familiarity with REST APIs and Django REST Framework",
                            "Knowledge of Git, Docker, and deployment processes",
                            "Understanding of software testing and debugging",
                            "Bachelor's degree in Computer Science or equivalent experience",
                        ]),
                        experience_level: "Mid-Level".to_string(),
                        skills_required: strings(&[
                            "Django",
                            "Python",
                            "JavaScript",
                            "PostgreSQL",
                            "REST APIs",
                            "Docker",
                        ]),
                        location: "New York, NY / Hybrid".to_string(),
                        salary_range: "$80,000 - $120,000".to_string(),
                        job_type: "Full-time".to_string(),
                    },
                },
                CatalogEntry {
                    key: "Python Developer".to_string(),
                    posting: JobPosting {
                        title: "Python Backend Developer".to_string(),
                        company: "StartupTech".to_string(),
                        description: "Looking for a talented Python developer to build robust backend systems and APIs.".to_string(),
                        requirements: strings(&[
                            "2+ years of Python development experience",
                            "Knowledge of FastAPI, Flask, or Django",
                            "Experience with databases (PostgreSQL, MongoDB)",
                            "Understanding of REST APIs and microservices",
                            "Familiarity with Docker and cloud services",
                            "Knowledge of testing frameworks",
                            "Good problem-solving skills",
                        ]),
                        experience_level: "Mid-Level".to_string(),
                        skills_required: strings(&[
                            "Python",
                            "FastAPI",
                            "Flask",
                            "PostgreSQL",
                            "MongoDB",
                            "Docker",
                        ]),
                        location: "Austin, TX / Remote".to_string(),
                        salary_range: "$70,000 - $100,000".to_string(),
                        job_type: "Full-time".to_string(),
                    },
                },
            ],
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

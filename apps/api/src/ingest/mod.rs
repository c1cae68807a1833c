//! Text Extractor: turns an uploaded CV into plain text before screening.
//!
//! Three formats are accepted: plain text, PDF, and DOCX. Anything else fails with
//! `UnsupportedFormat`; a file that cannot be decoded fails with `ParseFailure` and
//! yields no partial text.

mod docx;
mod pdf;

use std::fmt;
use std::path::Path;

use thiserror::Error;

pub const MIME_TEXT: &str = "text/plain";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Error parsing CV: {0}")]
    ParseFailure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Resolves a MIME type, ignoring parameters such as `; charset=utf-8`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            MIME_TEXT => Some(DocumentFormat::PlainText),
            MIME_PDF => Some(DocumentFormat::Pdf),
            MIME_DOCX => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Some(DocumentFormat::PlainText),
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    /// Picks the format from an upload's declared content type, falling back to the
    /// file name's extension when the content type is absent or unrecognized.
    pub fn detect(
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Self, ExtractError> {
        content_type
            .and_then(Self::from_mime)
            .or_else(|| file_name.and_then(Self::from_file_name))
            .ok_or_else(|| {
                let declared = content_type
                    .or(file_name)
                    .unwrap_or("unknown")
                    .to_string();
                ExtractError::UnsupportedFormat(declared)
            })
    }

    pub fn mime(self) -> &'static str {
        match self {
            DocumentFormat::PlainText => MIME_TEXT,
            DocumentFormat::Pdf => MIME_PDF,
            DocumentFormat::Docx => MIME_DOCX,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

pub fn supported_mime_types() -> [&'static str; 3] {
    [MIME_PDF, MIME_DOCX, MIME_TEXT]
}

/// Extracts plain text from a document in the given format.
///
/// Compressed formats can inflate far beyond their upload size, so no format may
/// produce more than `max_text_bytes` of text; exceeding it is a `ParseFailure`.
pub fn extract_text(
    bytes: &[u8],
    format: DocumentFormat,
    max_text_bytes: usize,
) -> Result<String, ExtractError> {
    let text = match format {
        DocumentFormat::PlainText => std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| ExtractError::ParseFailure(format!("invalid UTF-8: {e}")))?,
        DocumentFormat::Pdf => pdf::extract(bytes)?,
        DocumentFormat::Docx => docx::extract(bytes, max_text_bytes)?,
    };
    if text.len() > max_text_bytes {
        return Err(too_large(format, max_text_bytes));
    }
    Ok(text)
}

fn too_large(format: DocumentFormat, limit: usize) -> ExtractError {
    ExtractError::ParseFailure(format!(
        "{format} content expands past the {limit} byte limit"
    ))
}

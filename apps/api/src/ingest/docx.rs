use std::io::{Cursor, Read};

use roxmltree::{Document, Node};

use super::ExtractError;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts paragraph text from a DOCX package, one line per paragraph, trimmed.
///
/// `word/document.xml` is inflated at most to `max_xml_bytes`; a larger part is rejected
/// before it is parsed.
pub(super) fn extract(bytes: &[u8], max_xml_bytes: usize) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::ParseFailure(format!("not a DOCX package: {e}")))?;

    let part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::ParseFailure(format!("missing {DOCUMENT_PART}: {e}")))?;

    let mut raw = Vec::new();
    part.take(max_xml_bytes as u64 + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ExtractError::ParseFailure(format!("unreadable {DOCUMENT_PART}: {e}")))?;
    if raw.len() > max_xml_bytes {
        return Err(ExtractError::ParseFailure(format!(
            "{DOCUMENT_PART} inflates past the {max_xml_bytes} byte limit"
        )));
    }
    let xml = String::from_utf8(raw)
        .map_err(|e| ExtractError::ParseFailure(format!("unreadable {DOCUMENT_PART}: {e}")))?;

    let doc = Document::parse(&xml)
        .map_err(|e| ExtractError::ParseFailure(format!("malformed document XML: {e}")))?;

    let mut text = String::new();
    for paragraph in doc
        .descendants()
        .filter(|n| is_word(n, "p") && !inside_paragraph(n))
    {
        text.push_str(&paragraph_text(paragraph));
        text.push('\n');
    }

    Ok(text.trim().to_string())
}

fn is_word(node: &Node, name: &str) -> bool {
    node.has_tag_name((WORD_NS, name))
}

// Text boxes nest paragraphs inside paragraphs; the outer one already carries their runs.
fn inside_paragraph(node: &Node) -> bool {
    node.ancestors().skip(1).any(|a| is_word(&a, "p"))
}

fn paragraph_text(paragraph: Node) -> String {
    let mut out = String::new();
    for node in paragraph.descendants() {
        if is_word(&node, "t") {
            out.push_str(node.text().unwrap_or_default());
        } else if is_word(&node, "tab") {
            out.push('\t');
        } else if is_word(&node, "br") || is_word(&node, "cr") {
            out.push('\n');
        }
    }
    out
}

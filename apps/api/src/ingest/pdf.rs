use super::ExtractError;

/// Extracts the text of every page, trimmed. pdf-extract separates pages with newlines.
pub(super) fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed inputs rather than returning an error.
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    match result {
        Ok(Ok(text)) => Ok(text.trim().to_string()),
        Ok(Err(e)) => Err(ExtractError::ParseFailure(format!("unreadable PDF: {e}"))),
        Err(_) => Err(ExtractError::ParseFailure(
            "unreadable PDF: decoder aborted".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal PDF with one Helvetica text line per page and a correct xref table.
    fn pdf_with_pages(lines: &[&str]) -> Vec<u8> {
        let page_count = lines.len();
        let font_id = 3 + 2 * page_count;
        let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", 3 + 2 * i)).collect();

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {page_count} >>",
                kids.join(" ")
            ),
        ];
        for (i, line) in lines.iter().enumerate() {
            let content = format!("BT /F1 24 Tf 72 700 Td ({line}) Tj ET");
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 {font_id} 0 R >> >> /Contents {} 0 R >>",
                4 + 2 * i
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let xref_offset = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    #[test]
    fn test_pages_are_extracted_in_order() {
        let text = extract(&pdf_with_pages(&["Summary", "Experience"])).unwrap();

        let first = text.find("Summary").expect("first page text");
        let second = text.find("Experience").expect("second page text");
        assert!(first < second, "{text:?}");
        assert!(text[first..second].contains('\n'), "{text:?}");
        assert_eq!(text, text.trim());
    }

    #[test]
    fn test_single_page_is_trimmed() {
        let text = extract(&pdf_with_pages(&["JaneDoe"])).unwrap();
        assert_eq!(text, "JaneDoe");
    }

    #[test]
    fn test_garbage_is_parse_failure() {
        let err = extract(b"this is not a pdf at all").unwrap_err();
        assert!(matches!(err, ExtractError::ParseFailure(_)));
    }

    #[test]
    fn test_empty_buffer_is_parse_failure() {
        assert!(matches!(extract(&[]), Err(ExtractError::ParseFailure(_))));
    }
}

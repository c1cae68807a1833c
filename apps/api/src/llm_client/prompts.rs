// Shared prompt fragments. The screening steps keep their own templates in
// screening::prompts; this file holds the cross-cutting pieces.

/// Appended to prompts whose answer must be a bare value with no commentary.
pub const BARE_ANSWER_INSTRUCTION: &str =
    "Do not add explanations, punctuation, or any other text.";

/// Appended to prompts whose output is shown to the candidate verbatim.
pub const NO_SIGNATURE_INSTRUCTION: &str = "Address the candidate directly. \
    Do NOT end with a letter closing or signature block, and never include \
    placeholders such as [Your Name] or [Your Position].";

/// Replaces every `{name}` placeholder in `template` with its value in a single pass.
/// Substituted values are copied through as-is, never scanned for placeholders.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substitution = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| (close, *value))
        });
        match substitution {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Returns at most `max_chars` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

//! Coreference resolution and named-entity recognition stand-ins.
//!
//! Neither is implemented: coreference resolution returns its input unchanged
//! and entity extraction finds nothing. They keep the shape of the summary
//! stable for callers that read the `entities` field.

/// Resolve pronoun references in `text`. Currently the identity.
pub fn resolve_coreferences(text: &str) -> &str {
    text
}

/// Named entities mentioned in `text`. Currently always empty.
pub fn extract_entities(_text: &str) -> Vec<String> {
    Vec::new()
}

//! Single-section extraction for the advice flow

use super::SECTION_MARKER;
use crate::error::TemplateError;
use crate::registry::SectionSpec;

/// Body of the section introduced by `header`
///
/// Collection starts after the first line whose trimmed text equals
/// `header` and stops at the next line beginning with `## `. Collected lines
/// are trimmed and joined with `\n`; the result is trimmed. Returns an empty
/// string when the header is absent or its section is empty.
#[must_use]
pub fn extract_section(doc: &str, header: &str) -> String {
    let mut found = false;
    let mut collected: Vec<&str> = Vec::new();

    for line in doc.lines() {
        if line.trim() == header {
            found = true;
            continue;
        }
        if !found {
            continue;
        }
        if line.starts_with(SECTION_MARKER) {
            break;
        }
        collected.push(line.trim());
    }

    collected.join("\n").trim().to_string()
}

/// Like [`extract_section`] but an empty body is an error
///
/// # Errors
/// `TemplateError::EmptyExtraction` if nothing was collected
pub fn extract_required(doc: &str, header: &str) -> Result<String, TemplateError> {
    let extracted = extract_section(doc, header);
    if extracted.is_empty() {
        tracing::debug!(header, "section extraction came back empty");
        return Err(TemplateError::empty_extraction(header));
    }
    Ok(extracted)
}

/// Check if any line of `doc` is one of the spec's headers
#[must_use]
pub fn has_sections(doc: &str, spec: &SectionSpec) -> bool {
    doc.lines()
        .any(|line| spec.field_for_header(line.trim()).is_some())
}

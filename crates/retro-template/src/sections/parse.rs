//! Whole-document parser

use super::Line;
use crate::answer::ParsedAnswer;
use crate::error::TemplateError;
use crate::field::FieldKey;
use crate::registry::{spec_for_name, SectionSpec};

/// Parse a document into per-field values
///
/// Single pass over the lines with one open section at a time:
/// - an exact header line opens its field's section
/// - any other `## ` line closes the open section; what follows is dropped
///   until a known header appears
/// - `###` sub-headings and blank lines are skipped without closing anything
/// - other lines are trimmed and appended to the open field, one per line
///
/// A header seen twice reopens its field and keeps appending, so both runs
/// end up concatenated in encounter order. Lines before the first header are
/// discarded. Fields never mentioned are empty; this never fails.
#[must_use]
pub fn parse(doc: &str, spec: &SectionSpec) -> ParsedAnswer {
    let mut answer = ParsedAnswer::empty(spec);
    let mut current: Option<FieldKey> = None;
    let mut dropped = 0usize;

    for raw in doc.lines() {
        match Line::classify(raw.trim(), spec) {
            Line::Header(field) => current = Some(field),
            Line::ForeignHeader => current = None,
            Line::SubHeading | Line::Blank => {}
            Line::Body(text) => match current {
                Some(field) => answer.push_line(field, text),
                None => dropped += 1,
            },
        }
    }

    answer.trim_values();
    tracing::debug!(
        template = %spec.kind(),
        dropped_lines = dropped,
        "parsed retrospective document"
    );
    answer
}

/// Parse against a template named by an unvalidated string
///
/// # Errors
/// `TemplateError::UnknownTemplate` if the name is not registered
pub fn parse_named(doc: &str, template_name: &str) -> Result<ParsedAnswer, TemplateError> {
    spec_for_name(template_name).map(|spec| parse(doc, spec))
}

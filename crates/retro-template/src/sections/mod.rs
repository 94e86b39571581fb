//! Section handling for retrospective documents
//!
//! A document is a run of lines where `## Header` lines open sections:
//! - [`parse`] splits a whole document into a [`ParsedAnswer`](crate::ParsedAnswer)
//! - [`extract_section`] pulls out the body of a single header
//! - [`render`] writes answers back into the same layout
//!
//! Everything here is pure over its input strings.

mod extract;
mod parse;
mod prompts;
mod render;

pub use extract::{extract_required, extract_section, has_sections};
pub use parse::{parse, parse_named};
pub use prompts::{prompt_for, title_line, EMPTY_PLACEHOLDER};
pub use render::{render, render_answers, render_spec};

use crate::field::FieldKey;
use crate::registry::SectionSpec;

/// Marker that opens a section line
pub const SECTION_MARKER: &str = "## ";

/// Prefix shared by section lines and deeper sub-headings
const HEADING_PREFIX: &str = "##";

/// Classification of one trimmed document line against a spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    /// Exact header of the spec
    Header(FieldKey),
    /// Section line the spec does not know
    ForeignHeader,
    /// `###` and deeper, or a bare `##`
    SubHeading,
    /// Empty after trimming
    Blank,
    /// Ordinary content
    Body(&'a str),
}

impl<'a> Line<'a> {
    fn classify(trimmed: &'a str, spec: &SectionSpec) -> Self {
        if let Some(field) = spec.field_for_header(trimmed) {
            Self::Header(field)
        } else if trimmed.starts_with(SECTION_MARKER) {
            Self::ForeignHeader
        } else if trimmed.starts_with(HEADING_PREFIX) {
            Self::SubHeading
        } else if trimmed.is_empty() {
            Self::Blank
        } else {
            Self::Body(trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::TemplateKind;

    #[test]
    fn classify_lines() {
        let spec = TemplateKind::Kpt.spec();
        assert_eq!(Line::classify("## Keep", spec), Line::Header(FieldKey::Keep));
        assert_eq!(Line::classify("## Stop", spec), Line::ForeignHeader);
        assert_eq!(Line::classify("## keep", spec), Line::ForeignHeader);
        assert_eq!(Line::classify("### What went well?", spec), Line::SubHeading);
        assert_eq!(Line::classify("##", spec), Line::SubHeading);
        assert_eq!(Line::classify("", spec), Line::Blank);
        assert_eq!(Line::classify("# Sprint 1", spec), Line::Body("# Sprint 1"));
        assert_eq!(Line::classify("- item", spec), Line::Body("- item"));
    }
}

//! Request adapters
//!
//! Turn submitted answers and advice input into the template crate's types.

use crate::api::AnswerPayload;
use retro_template::{
    extract_required, has_sections, parse, FieldKey, ParsedAnswer, SectionSpec, TemplateError,
    TemplateKind, SECTION_MARKER,
};

/// Answers for `kind` from either payload form
///
/// A document goes through the section parser. A field map is matched key
/// by key; keys the template does not have are rejected and absent keys
/// stay empty.
///
/// # Errors
/// `TemplateError::UnknownField` or `TemplateError::FieldNotInTemplate` for
/// a bad field map key
pub fn answer_from_payload(
    kind: TemplateKind,
    payload: &AnswerPayload,
) -> Result<ParsedAnswer, TemplateError> {
    match payload {
        AnswerPayload::Document(doc) => Ok(parse(doc, kind.spec())),
        AnswerPayload::Fields(fields) => {
            let mut answer = ParsedAnswer::for_kind(kind);
            for (key, value) in fields {
                let field = FieldKey::from_payload_key(key)?;
                answer.set(field, value.trim())?;
            }
            Ok(answer)
        }
    }
}

/// Text to request advice on
///
/// A value with any `## ` section line, from this template or another, is
/// treated as a whole document and reduced to the advice section. Anything
/// else is the field text itself.
///
/// # Errors
/// `TemplateError::EmptyExtraction` if the advice section is missing or empty
pub fn advice_text(spec: &SectionSpec, value: &str) -> Result<String, TemplateError> {
    if is_document(spec, value) {
        extract_required(value, spec.advice_section().header())
    } else {
        Ok(value.trim().to_string())
    }
}

fn is_document(spec: &SectionSpec, value: &str) -> bool {
    has_sections(value, spec)
        || value
            .lines()
            .any(|line| line.trim_start().starts_with(SECTION_MARKER))
}

/// Check if a requested field name refers to the template's advice section
///
/// Accepts the header (`## Problem`), the title (`Problem`) or the field key
/// in any case (`PROBLEM`, `css_stop`).
#[must_use]
pub fn advice_field_matches(spec: &SectionSpec, field_name: &str) -> bool {
    let section = spec.advice_section();
    let name = field_name.trim();
    name == section.header()
        || name == section.title()
        || FieldKey::from_payload_key(name).is_ok_and(|field| field == section.field())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn document_payload_is_parsed() {
        let payload = AnswerPayload::from("## Keep\nfoo\n## Try\nbar");
        let answer = answer_from_payload(TemplateKind::Kpt, &payload).unwrap();
        assert_eq!(answer.value(FieldKey::Keep), "foo");
        assert_eq!(answer.value(FieldKey::Problem), "");
        assert_eq!(answer.value(FieldKey::Try), "bar");
    }

    #[test]
    fn field_payload_is_renamed() {
        let fields: IndexMap<String, String> = [
            ("css_stop".to_string(), " late merges \n".to_string()),
            ("CSS_START".to_string(), "demos".to_string()),
        ]
        .into_iter()
        .collect();
        let answer = answer_from_payload(TemplateKind::Css, &AnswerPayload::Fields(fields)).unwrap();
        assert_eq!(answer.value(FieldKey::CssStop), "late merges");
        assert_eq!(answer.value(FieldKey::CssStart), "demos");
        assert_eq!(answer.value(FieldKey::CssContinue), "");
    }

    #[test]
    fn field_payload_rejects_foreign_keys() {
        let fields: IndexMap<String, String> =
            [("keep".to_string(), "x".to_string())].into_iter().collect();
        let err = answer_from_payload(TemplateKind::FourLs, &AnswerPayload::Fields(fields)).unwrap_err();
        assert_eq!(
            err,
            TemplateError::FieldNotInTemplate {
                field: FieldKey::Keep,
                template: TemplateKind::FourLs,
            }
        );

        let fields: IndexMap<String, String> =
            [("mood".to_string(), "x".to_string())].into_iter().collect();
        let err = answer_from_payload(TemplateKind::Kpt, &AnswerPayload::Fields(fields)).unwrap_err();
        assert_eq!(err, TemplateError::UnknownField("mood".to_string()));
    }

    #[test]
    fn advice_text_from_document() {
        let spec = TemplateKind::Kpt.spec();
        let doc = "## Keep\nfine\n## Problem\n  slow reviews  \n## Try\nnothing";
        assert_eq!(advice_text(spec, doc), Ok("slow reviews".to_string()));
    }

    #[test]
    fn advice_text_from_plain_value() {
        let spec = TemplateKind::Css.spec();
        assert_eq!(advice_text(spec, "  too many meetings "), Ok("too many meetings".to_string()));
    }

    #[test]
    fn advice_text_with_empty_section_fails() {
        let spec = TemplateKind::FourLs.spec();
        let doc = "## Liked\npairing\n## Lacked\n\n## Learned\nrust";
        assert_eq!(
            advice_text(spec, doc),
            Err(TemplateError::empty_extraction("## Lacked"))
        );
    }

    #[test]
    fn advice_text_from_other_template_document() {
        let spec = TemplateKind::Kpt.spec();
        let css = "## Continue\ndemos\n## Stop\nlate merges\n## Start\nADRs";
        assert_eq!(
            advice_text(spec, css),
            Err(TemplateError::empty_extraction("## Problem"))
        );

        let doc = "  ## Notes\nslow CI\n## Problem\nflaky tests";
        assert_eq!(advice_text(spec, doc), Ok("flaky tests".to_string()));
    }

    #[test]
    fn advice_text_keeps_inline_hashes() {
        let spec = TemplateKind::Kpt.spec();
        assert_eq!(
            advice_text(spec, "issue ## 42 keeps failing"),
            Ok("issue ## 42 keeps failing".to_string())
        );
    }

    #[test]
    fn advice_field_names() {
        let spec = TemplateKind::Kpt.spec();
        assert!(advice_field_matches(spec, "## Problem"));
        assert!(advice_field_matches(spec, "Problem"));
        assert!(advice_field_matches(spec, "problem"));
        assert!(advice_field_matches(spec, "PROBLEM"));
        assert!(!advice_field_matches(spec, "KEEP"));
        assert!(!advice_field_matches(spec, "## Stop"));

        let spec = TemplateKind::Css.spec();
        assert!(advice_field_matches(spec, "css_stop"));
        assert!(advice_field_matches(spec, "Stop"));
    }
}

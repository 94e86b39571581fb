//! Subcommand bodies
//!
//! Each command takes its input text and returns the text to print, so the
//! binary only deals with argument parsing and I/O.

use anyhow::{bail, Context, Result};
use retro_core::adapters::answer_from_payload;
use retro_core::{AdviceRequest, AnswerPayload, RetroService};
use retro_template::{all_specs, extract_section, parse, render_spec, TemplateKind};

/// Registered templates, one per line or as JSON
pub(crate) fn templates(json: bool) -> Result<String> {
    if json {
        let listing: Vec<_> = all_specs()
            .map(|spec| {
                serde_json::json!({
                    "name": spec.kind().name(),
                    "headers": spec.sections().iter().map(|s| s.header()).collect::<Vec<_>>(),
                    "fields": spec.field_keys().map(|f| f.as_str()).collect::<Vec<_>>(),
                    "advice": spec.advice_section().header(),
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&listing)?);
    }

    let lines: Vec<String> = all_specs()
        .map(|spec| {
            let headers: Vec<_> = spec.sections().iter().map(|s| s.header()).collect();
            format!(
                "{:<8} {}  (advice: {})",
                spec.kind().name(),
                headers.join(", "),
                spec.advice_section().header()
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Parse a document into pretty JSON
pub(crate) fn parse_document(template: &str, doc: &str) -> Result<String> {
    let kind = TemplateKind::from_name(template)?;
    let answer = parse(doc, kind.spec());
    tracing::debug!(template = %kind, fields = answer.len(), "document parsed");
    Ok(serde_json::to_string_pretty(&answer)?)
}

/// Render JSON answers, either a field map or a whole document string
pub(crate) fn render_document(template: &str, sprint: &str, input: &str) -> Result<String> {
    let kind = TemplateKind::from_name(template)?;
    let payload: AnswerPayload =
        serde_json::from_str(input).context("answers must be a JSON object or string")?;
    let answer = answer_from_payload(kind, &payload)?;
    Ok(render_spec(kind.spec(), sprint, &answer))
}

/// Body of one section
pub(crate) fn extract(header: &str, doc: &str) -> Result<String> {
    let header = header.trim();
    if !header.starts_with(retro_template::SECTION_MARKER) {
        bail!("header must start with '{}': {header:?}", retro_template::SECTION_MARKER);
    }
    Ok(extract_section(doc, header))
}

/// Advice from the configured text-generation service
pub(crate) async fn advice(
    service: &RetroService,
    template: &str,
    field: Option<&str>,
    value: &str,
) -> Result<String> {
    let mut request = AdviceRequest::new(template, value);
    if let Some(field) = field {
        request = request.with_field_name(field);
    }
    let advice = service.advice(&request).await?;
    Ok(advice.advice)
}

//! Renderer: answers back into the sectioned layout

use super::prompts::{prompt_for, title_line, EMPTY_PLACEHOLDER};
use crate::answer::{ParsedAnswer, TemplateAnswers};
use crate::error::TemplateError;
use crate::registry::{spec_for_name, SectionSpec};

/// Render answers for a template named by an unvalidated string
///
/// # Errors
/// `TemplateError::UnknownTemplate` if the name is not registered
pub fn render(
    template_name: &str,
    sprint_label: &str,
    answers: &ParsedAnswer,
) -> Result<String, TemplateError> {
    let spec = spec_for_name(template_name)?;
    Ok(render_spec(spec, sprint_label, answers))
}

/// Render answers against a known layout
///
/// Emits the title, then for every section in order its header, its
/// `###` prompt and its content (`-` when empty). Blocks are separated by
/// one blank line and the output has no trailing newline.
#[must_use]
pub fn render_spec(spec: &SectionSpec, sprint_label: &str, answers: &ParsedAnswer) -> String {
    let mut blocks = Vec::with_capacity(spec.len() + 1);
    blocks.push(title_line(sprint_label));

    for section in spec.sections() {
        let content = answers
            .get(section.field())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(EMPTY_PLACEHOLDER);
        blocks.push(format!(
            "{}\n### {}\n{}",
            section.header(),
            prompt_for(section.field()),
            content
        ));
    }

    blocks.join("\n\n")
}

/// Render typed answers under their own template
#[must_use]
pub fn render_answers(sprint_label: &str, answers: &TemplateAnswers) -> String {
    render_spec(answers.kind().spec(), sprint_label, &answers.to_parsed())
}

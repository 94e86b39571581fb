//! Structured answers
//!
//! [`ParsedAnswer`] is the string-keyed form that crosses crate boundaries:
//! its key set always equals the template's field set. [`TemplateAnswers`]
//! is the typed form with one named slot per field.

use crate::error::TemplateError;
use crate::field::FieldKey;
use crate::kind::TemplateKind;
use crate::registry::{section_spec_for, SectionSpec};
use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

/// Field values extracted for one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnswer {
    kind: TemplateKind,
    values: IndexMap<FieldKey, String>,
}

impl ParsedAnswer {
    /// Answer with every field of `spec` present and empty
    #[must_use]
    pub fn empty(spec: &SectionSpec) -> Self {
        Self {
            kind: spec.kind(),
            values: spec.field_keys().map(|f| (f, String::new())).collect(),
        }
    }

    /// Empty answer for a template kind
    #[inline]
    #[must_use]
    pub fn for_kind(kind: TemplateKind) -> Self {
        Self::empty(section_spec_for(kind))
    }

    /// Template the answer belongs to
    #[inline]
    #[must_use]
    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    /// Value of a field, `None` if the field is foreign to the template
    #[inline]
    #[must_use]
    pub fn get(&self, field: FieldKey) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Value of a field, empty for foreign fields
    #[inline]
    #[must_use]
    pub fn value(&self, field: FieldKey) -> &str {
        self.get(field).unwrap_or_default()
    }

    /// Replace the value of a field
    ///
    /// # Errors
    /// `TemplateError::FieldNotInTemplate` if the field belongs elsewhere
    pub fn set(&mut self, field: FieldKey, value: impl Into<String>) -> Result<(), TemplateError> {
        match self.values.get_mut(&field) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(TemplateError::FieldNotInTemplate {
                field,
                template: self.kind,
            }),
        }
    }

    /// Builder form of [`ParsedAnswer::set`]
    ///
    /// # Errors
    /// Same as [`ParsedAnswer::set`]
    pub fn with(mut self, field: FieldKey, value: impl Into<String>) -> Result<Self, TemplateError> {
        self.set(field, value)?;
        Ok(self)
    }

    /// Append one body line plus newline to a field
    pub(crate) fn push_line(&mut self, field: FieldKey, line: &str) {
        if let Some(slot) = self.values.get_mut(&field) {
            slot.push_str(line);
            slot.push('\n');
        }
    }

    /// Strip trailing whitespace from every value
    pub(crate) fn trim_values(&mut self) {
        for value in self.values.values_mut() {
            let kept = value.trim_end().len();
            value.truncate(kept);
        }
    }

    /// Fields and values in template order
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True only for a template without fields, which the registry never has
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when every value is empty or whitespace
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.values.values().all(|v| v.trim().is_empty())
    }

    /// String-keyed copy, as handed to persistence and summarization
    #[must_use]
    pub fn to_field_map(&self) -> IndexMap<String, String> {
        self.values
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.clone()))
            .collect()
    }
}

impl Serialize for ParsedAnswer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.values.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

/// Typed answers, one variant per template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateAnswers {
    /// Keep / Problem / Try
    Kpt {
        /// `KEEP`
        keep: String,
        /// `PROBLEM`
        problem: String,
        /// `TRY`
        try_: String,
    },
    /// Continue / Stop / Start
    Css {
        /// `CSS_CONTINUE`
        continue_: String,
        /// `CSS_STOP`
        stop: String,
        /// `CSS_START`
        start: String,
    },
    /// Liked / Learned / Lacked / Logged for
    FourLs {
        /// `LIKED`
        liked: String,
        /// `LEARNED`
        learned: String,
        /// `LACKED`
        lacked: String,
        /// `LOGGED_FOR`
        logged_for: String,
    },
}

impl TemplateAnswers {
    /// All-empty answers for a template
    #[must_use]
    pub fn empty(kind: TemplateKind) -> Self {
        match kind {
            TemplateKind::Kpt => Self::Kpt {
                keep: String::new(),
                problem: String::new(),
                try_: String::new(),
            },
            TemplateKind::Css => Self::Css {
                continue_: String::new(),
                stop: String::new(),
                start: String::new(),
            },
            TemplateKind::FourLs => Self::FourLs {
                liked: String::new(),
                learned: String::new(),
                lacked: String::new(),
                logged_for: String::new(),
            },
        }
    }

    /// Template of this variant
    #[must_use]
    pub const fn kind(&self) -> TemplateKind {
        match self {
            Self::Kpt { .. } => TemplateKind::Kpt,
            Self::Css { .. } => TemplateKind::Css,
            Self::FourLs { .. } => TemplateKind::FourLs,
        }
    }

    /// Value of a field, `None` if the field is foreign to the variant
    #[must_use]
    pub fn get(&self, field: FieldKey) -> Option<&str> {
        let slot = match (self, field) {
            (Self::Kpt { keep, .. }, FieldKey::Keep) => keep,
            (Self::Kpt { problem, .. }, FieldKey::Problem) => problem,
            (Self::Kpt { try_, .. }, FieldKey::Try) => try_,
            (Self::Css { continue_, .. }, FieldKey::CssContinue) => continue_,
            (Self::Css { stop, .. }, FieldKey::CssStop) => stop,
            (Self::Css { start, .. }, FieldKey::CssStart) => start,
            (Self::FourLs { liked, .. }, FieldKey::Liked) => liked,
            (Self::FourLs { learned, .. }, FieldKey::Learned) => learned,
            (Self::FourLs { lacked, .. }, FieldKey::Lacked) => lacked,
            (Self::FourLs { logged_for, .. }, FieldKey::LoggedFor) => logged_for,
            _ => return None,
        };
        Some(slot.as_str())
    }

    fn slot_mut(&mut self, field: FieldKey) -> Option<&mut String> {
        let slot = match (self, field) {
            (Self::Kpt { keep, .. }, FieldKey::Keep) => keep,
            (Self::Kpt { problem, .. }, FieldKey::Problem) => problem,
            (Self::Kpt { try_, .. }, FieldKey::Try) => try_,
            (Self::Css { continue_, .. }, FieldKey::CssContinue) => continue_,
            (Self::Css { stop, .. }, FieldKey::CssStop) => stop,
            (Self::Css { start, .. }, FieldKey::CssStart) => start,
            (Self::FourLs { liked, .. }, FieldKey::Liked) => liked,
            (Self::FourLs { learned, .. }, FieldKey::Learned) => learned,
            (Self::FourLs { lacked, .. }, FieldKey::Lacked) => lacked,
            (Self::FourLs { logged_for, .. }, FieldKey::LoggedFor) => logged_for,
            _ => return None,
        };
        Some(slot)
    }

    /// Replace the value of a field
    ///
    /// # Errors
    /// `TemplateError::FieldNotInTemplate` if the field belongs elsewhere
    pub fn set(&mut self, field: FieldKey, value: impl Into<String>) -> Result<(), TemplateError> {
        let template = self.kind();
        let slot = self
            .slot_mut(field)
            .ok_or(TemplateError::FieldNotInTemplate { field, template })?;
        *slot = value.into();
        Ok(())
    }

    /// String-keyed form
    #[must_use]
    pub fn to_parsed(&self) -> ParsedAnswer {
        let mut parsed = ParsedAnswer::for_kind(self.kind());
        for (field, slot) in &mut parsed.values {
            slot.push_str(self.get(*field).unwrap_or_default());
        }
        parsed
    }

    /// True when every field is empty or whitespace
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.to_parsed().is_blank()
    }
}

impl From<&ParsedAnswer> for TemplateAnswers {
    fn from(parsed: &ParsedAnswer) -> Self {
        let mut answers = Self::empty(parsed.kind());
        for (field, value) in parsed.iter() {
            if let Some(slot) = answers.slot_mut(field) {
                value.clone_into(slot);
            }
        }
        answers
    }
}

impl From<ParsedAnswer> for TemplateAnswers {
    fn from(parsed: ParsedAnswer) -> Self {
        Self::from(&parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_answer_has_every_field() {
        for kind in TemplateKind::ALL {
            let answer = ParsedAnswer::for_kind(kind);
            let fields: Vec<_> = answer.iter().map(|(f, _)| f).collect();
            let expected: Vec<_> = kind.spec().field_keys().collect();
            assert_eq!(fields, expected);
            assert!(answer.is_blank());
        }
    }

    #[test]
    fn set_rejects_foreign_field() {
        let mut answer = ParsedAnswer::for_kind(TemplateKind::Kpt);
        assert!(answer.set(FieldKey::Keep, "ship it").is_ok());
        assert_eq!(answer.value(FieldKey::Keep), "ship it");

        let err = answer.set(FieldKey::CssStop, "nope").unwrap_err();
        assert_eq!(
            err,
            TemplateError::FieldNotInTemplate {
                field: FieldKey::CssStop,
                template: TemplateKind::Kpt,
            }
        );
        assert_eq!(answer.get(FieldKey::CssStop), None);
        assert_eq!(answer.value(FieldKey::CssStop), "");
    }

    #[test]
    fn serializes_as_string_map() {
        let answer = ParsedAnswer::for_kind(TemplateKind::Css)
            .with(FieldKey::CssStop, "late merges")
            .unwrap();
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "CSS_CONTINUE": "",
                "CSS_STOP": "late merges",
                "CSS_START": "",
            })
        );
    }

    #[test]
    fn field_map_keeps_template_order() {
        let answer = ParsedAnswer::for_kind(TemplateKind::FourLs);
        let keys: Vec<_> = answer.to_field_map().into_keys().collect();
        assert_eq!(keys, ["LIKED", "LEARNED", "LACKED", "LOGGED_FOR"]);
    }

    #[test]
    fn typed_answers_roundtrip() {
        let parsed = ParsedAnswer::for_kind(TemplateKind::FourLs)
            .with(FieldKey::Liked, "pairing")
            .unwrap()
            .with(FieldKey::LoggedFor, "better estimates")
            .unwrap();

        let typed = TemplateAnswers::from(&parsed);
        assert_eq!(
            typed,
            TemplateAnswers::FourLs {
                liked: "pairing".to_string(),
                learned: String::new(),
                lacked: String::new(),
                logged_for: "better estimates".to_string(),
            }
        );
        assert_eq!(typed.to_parsed(), parsed);
    }

    #[test]
    fn typed_set_and_get() {
        let mut typed = TemplateAnswers::empty(TemplateKind::Kpt);
        typed.set(FieldKey::Try, "smaller PRs").unwrap();
        assert_eq!(typed.get(FieldKey::Try), Some("smaller PRs"));
        assert_eq!(typed.get(FieldKey::Liked), None);
        assert!(typed.set(FieldKey::Liked, "x").is_err());
        assert!(!typed.is_blank());
    }

    #[test]
    fn trim_values_strips_trailing_newlines() {
        let mut answer = ParsedAnswer::for_kind(TemplateKind::Kpt);
        answer.push_line(FieldKey::Keep, "a");
        answer.push_line(FieldKey::Keep, "b");
        answer.trim_values();
        assert_eq!(answer.value(FieldKey::Keep), "a\nb");
    }
}

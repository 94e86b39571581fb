//! Error types for template lookup and section handling
//!
//! Parsing and rendering are total, so the only failures here come from
//! resolving names into templates or fields, or from a caller insisting on
//! non-empty extracted content.

use crate::field::FieldKey;
use crate::kind::TemplateKind;

/// Errors raised by the template layer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// Name does not resolve to a registered template
    #[error("unknown template: '{0}'")]
    UnknownTemplate(String),

    /// Extracted section had no content where content was required
    #[error("no content found under {header} section")]
    EmptyExtraction {
        /// Header text that was searched for
        header: String,
    },

    /// Field exists but belongs to another template
    #[error("field {field} is not part of the {template} template")]
    FieldNotInTemplate {
        /// The offending field
        field: FieldKey,
        /// Template the write was attempted on
        template: TemplateKind,
    },

    /// Name does not resolve to any field key
    #[error("unknown field: '{0}'")]
    UnknownField(String),
}

impl TemplateError {
    /// Create empty extraction error for a header
    #[inline]
    pub fn empty_extraction(header: impl Into<String>) -> Self {
        Self::EmptyExtraction {
            header: header.into(),
        }
    }

    /// Check if the error stems from caller input rather than a missing template
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::UnknownTemplate(_))
    }
}

/// Result type alias for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

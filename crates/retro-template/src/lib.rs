//! Retrospective templates
//!
//! The boundary between free-form retrospective text and structured answers.
//!
//! # Core Operations
//!
//! - **Lookup**: resolve a template name into its [`SectionSpec`]
//! - **Parse**: split a `## Section` document into a [`ParsedAnswer`]
//! - **Extract**: pull the body of a single section out of a document
//! - **Render**: write answers back into the same layout
//!
//! # Architecture
//!
//! ```text
//! template name → Registry → SectionSpec
//!                               ↓
//! document text → parse → ParsedAnswer ⇄ TemplateAnswers
//!                               ↓
//!                render → document text
//! ```
//!
//! Rendering then parsing returns the original answers whenever every field
//! is non-empty.
//!
//! # Example
//!
//! ```rust
//! use retro_template::{parse, render, FieldKey, TemplateKind};
//!
//! let spec = TemplateKind::Kpt.spec();
//! let answer = parse("## Keep\nfoo\n## Extra\nbar\n## Problem\nbaz", spec);
//! assert_eq!(answer.value(FieldKey::Keep), "foo");
//! assert_eq!(answer.value(FieldKey::Problem), "baz");
//! assert_eq!(answer.value(FieldKey::Try), "");
//!
//! let doc = render("KPT", "Sprint 1", &answer).unwrap();
//! assert!(doc.starts_with("# Sprint 1"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod answer;
pub mod error;
pub mod field;
pub mod kind;
pub mod registry;
pub mod sections;

// Re-exports for convenience
pub use answer::{ParsedAnswer, TemplateAnswers};
pub use error::{TemplateError, TemplateResult};
pub use field::FieldKey;
pub use kind::TemplateKind;
pub use registry::{all_specs, section_spec_for, spec_for_name, Section, SectionSpec};
pub use sections::{
    extract_required, extract_section, has_sections, parse, parse_named, render, render_answers,
    render_spec, SECTION_MARKER,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with retrospective templates
    pub use crate::answer::{ParsedAnswer, TemplateAnswers};
    pub use crate::error::TemplateError;
    pub use crate::field::FieldKey;
    pub use crate::kind::TemplateKind;
    pub use crate::registry::{section_spec_for, spec_for_name, SectionSpec};
    pub use crate::sections::{extract_section, parse, render};
}

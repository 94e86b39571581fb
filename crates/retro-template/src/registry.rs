//! Template registry
//!
//! Provides the fixed [`SectionSpec`] for every [`TemplateKind`]: the ordered
//! `## Header` lines a document is split on and the field each one fills.
//! Order fixes both parse precedence and render order.

use crate::error::TemplateError;
use crate::field::FieldKey;
use crate::kind::TemplateKind;
use crate::sections::SECTION_MARKER;

/// One section of a template: literal header line and target field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    header: &'static str,
    field: FieldKey,
}

impl Section {
    const fn new(header: &'static str, field: FieldKey) -> Self {
        Self { header, field }
    }

    /// Exact header line, marker included (`## Problem`)
    #[inline]
    #[must_use]
    pub const fn header(&self) -> &'static str {
        self.header
    }

    /// Field the section content is stored under
    #[inline]
    #[must_use]
    pub const fn field(&self) -> FieldKey {
        self.field
    }

    /// Header text without the section marker (`Problem`)
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.header
            .strip_prefix(SECTION_MARKER)
            .unwrap_or(self.header)
    }
}

/// Ordered section layout of one template
#[derive(Debug, PartialEq, Eq)]
pub struct SectionSpec {
    kind: TemplateKind,
    sections: &'static [Section],
    advice: FieldKey,
}

impl SectionSpec {
    /// Template this layout belongs to
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> TemplateKind {
        self.kind
    }

    /// Sections in document order
    #[inline]
    #[must_use]
    pub const fn sections(&self) -> &'static [Section] {
        self.sections
    }

    /// Number of sections
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always false for registered templates
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Field keys in document order
    pub fn field_keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.sections.iter().map(Section::field)
    }

    /// Check if the field belongs to this layout
    #[must_use]
    pub fn contains(&self, field: FieldKey) -> bool {
        self.field_keys().any(|f| f == field)
    }

    /// Field whose header equals `line` exactly
    #[must_use]
    pub fn field_for_header(&self, line: &str) -> Option<FieldKey> {
        self.sections
            .iter()
            .find(|s| s.header == line)
            .map(Section::field)
    }

    /// Section that stores `field`
    #[must_use]
    pub fn section_for(&self, field: FieldKey) -> Option<&'static Section> {
        self.sections.iter().find(|s| s.field == field)
    }

    /// Section the advice flow targets
    ///
    /// KPT asks about `## Problem`, CSS about `## Stop`, 4Ls about `## Lacked`.
    #[must_use]
    pub fn advice_section(&self) -> &'static Section {
        // every registered spec lists its advice field
        self.section_for(self.advice).unwrap_or(&self.sections[0])
    }
}

static KPT_SPEC: SectionSpec = SectionSpec {
    kind: TemplateKind::Kpt,
    sections: &[
        Section::new("## Keep", FieldKey::Keep),
        Section::new("## Problem", FieldKey::Problem),
        Section::new("## Try", FieldKey::Try),
    ],
    advice: FieldKey::Problem,
};

static CSS_SPEC: SectionSpec = SectionSpec {
    kind: TemplateKind::Css,
    sections: &[
        Section::new("## Continue", FieldKey::CssContinue),
        Section::new("## Stop", FieldKey::CssStop),
        Section::new("## Start", FieldKey::CssStart),
    ],
    advice: FieldKey::CssStop,
};

static FOUR_LS_SPEC: SectionSpec = SectionSpec {
    kind: TemplateKind::FourLs,
    sections: &[
        Section::new("## Liked", FieldKey::Liked),
        Section::new("## Learned", FieldKey::Learned),
        Section::new("## Lacked", FieldKey::Lacked),
        Section::new("## LoggedFor", FieldKey::LoggedFor),
    ],
    advice: FieldKey::Lacked,
};

/// Section layout for a template kind
#[inline]
#[must_use]
pub fn section_spec_for(kind: TemplateKind) -> &'static SectionSpec {
    match kind {
        TemplateKind::Kpt => &KPT_SPEC,
        TemplateKind::Css => &CSS_SPEC,
        TemplateKind::FourLs => &FOUR_LS_SPEC,
    }
}

/// Section layout for an unvalidated template name
///
/// # Errors
/// `TemplateError::UnknownTemplate` for any name outside the registry
pub fn spec_for_name(name: &str) -> Result<&'static SectionSpec, TemplateError> {
    TemplateKind::from_name(name).map(section_spec_for)
}

/// Every registered layout, in registry order
pub fn all_specs() -> impl Iterator<Item = &'static SectionSpec> {
    TemplateKind::ALL.into_iter().map(section_spec_for)
}

//! Template kinds
//!
//! The three questionnaire layouts a retrospective can follow. Names are
//! resolved with exact, case-sensitive matching.

use crate::error::TemplateError;
use crate::registry::{section_spec_for, SectionSpec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Retrospective template variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TemplateKind {
    /// Keep / Problem / Try
    #[serde(rename = "KPT")]
    Kpt,
    /// Continue / Stop / Start
    #[serde(rename = "CSS")]
    Css,
    /// Liked / Learned / Lacked / Logged for
    #[serde(rename = "FOUR_LS", alias = "FourLs")]
    FourLs,
}

impl TemplateKind {
    /// Every template, in registry order
    pub const ALL: [TemplateKind; 3] = [Self::Kpt, Self::Css, Self::FourLs];

    /// Canonical wire name
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kpt => "KPT",
            Self::Css => "CSS",
            Self::FourLs => "FOUR_LS",
        }
    }

    /// Resolve a template from its wire name
    ///
    /// Accepts `KPT`, `CSS`, `FOUR_LS` and the `FourLs` alias. Matching is
    /// exact: `kpt` or `4LS` are rejected.
    ///
    /// # Errors
    /// `TemplateError::UnknownTemplate` carrying the rejected name
    pub fn from_name(name: &str) -> Result<Self, TemplateError> {
        match name {
            "KPT" => Ok(Self::Kpt),
            "CSS" => Ok(Self::Css),
            "FOUR_LS" | "FourLs" => Ok(Self::FourLs),
            other => Err(TemplateError::UnknownTemplate(other.to_string())),
        }
    }

    /// Section layout for this template
    #[inline]
    #[must_use]
    pub fn spec(self) -> &'static SectionSpec {
        section_spec_for(self)
    }
}

impl FromStr for TemplateKind {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for kind in TemplateKind::ALL {
            assert_eq!(TemplateKind::from_name(kind.name()), Ok(kind));
        }
    }

    #[test]
    fn four_ls_alias() {
        assert_eq!(TemplateKind::from_name("FourLs"), Ok(TemplateKind::FourLs));
        assert_eq!(TemplateKind::FourLs.to_string(), "FOUR_LS");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        for name in ["kpt", "Kpt", "css", "four_ls", "FOURLS", "4LS", "4Ls", "", " KPT"] {
            assert_eq!(
                TemplateKind::from_name(name),
                Err(TemplateError::UnknownTemplate(name.to_string())),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn from_str_parses() {
        let kind: TemplateKind = "CSS".parse().unwrap();
        assert_eq!(kind, TemplateKind::Css);
        assert!("BOGUS".parse::<TemplateKind>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&TemplateKind::FourLs).unwrap();
        assert_eq!(json, "\"FOUR_LS\"");

        let kind: TemplateKind = serde_json::from_str("\"FourLs\"").unwrap();
        assert_eq!(kind, TemplateKind::FourLs);

        assert!(serde_json::from_str::<TemplateKind>("\"kpt\"").is_err());
    }
}

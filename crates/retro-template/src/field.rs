//! Field keys
//!
//! Stable identifiers that section content is stored under. The string form
//! is the upper-case column name used at the persistence boundary.

use crate::error::TemplateError;
use crate::kind::TemplateKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Structured field a template section maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldKey {
    /// KPT: what went well
    Keep,
    /// KPT: what needs fixing
    Problem,
    /// KPT: what to try next
    Try,
    /// CSS: behaviour to continue
    CssContinue,
    /// CSS: behaviour to stop
    CssStop,
    /// CSS: behaviour to start
    CssStart,
    /// 4Ls: liked
    Liked,
    /// 4Ls: learned
    Learned,
    /// 4Ls: lacked
    Lacked,
    /// 4Ls: logged for
    LoggedFor,
}

impl FieldKey {
    /// Every field key
    pub const ALL: [FieldKey; 10] = [
        Self::Keep,
        Self::Problem,
        Self::Try,
        Self::CssContinue,
        Self::CssStop,
        Self::CssStart,
        Self::Liked,
        Self::Learned,
        Self::Lacked,
        Self::LoggedFor,
    ];

    /// Upper-case identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keep => "KEEP",
            Self::Problem => "PROBLEM",
            Self::Try => "TRY",
            Self::CssContinue => "CSS_CONTINUE",
            Self::CssStop => "CSS_STOP",
            Self::CssStart => "CSS_START",
            Self::Liked => "LIKED",
            Self::Learned => "LEARNED",
            Self::Lacked => "LACKED",
            Self::LoggedFor => "LOGGED_FOR",
        }
    }

    /// Template this field belongs to
    #[must_use]
    pub const fn template(self) -> TemplateKind {
        match self {
            Self::Keep | Self::Problem | Self::Try => TemplateKind::Kpt,
            Self::CssContinue | Self::CssStop | Self::CssStart => TemplateKind::Css,
            Self::Liked | Self::Learned | Self::Lacked | Self::LoggedFor => TemplateKind::FourLs,
        }
    }

    /// Resolve a payload key leniently
    ///
    /// Structured answers arrive with lower-case keys and a trailing
    /// underscore where the name clashes with a keyword (`try_`), so this
    /// upper-cases and drops trailing underscores before matching.
    ///
    /// # Errors
    /// `TemplateError::UnknownField` if nothing matches
    pub fn from_payload_key(key: &str) -> Result<Self, TemplateError> {
        let normalized = key.trim().trim_end_matches('_').to_ascii_uppercase();
        normalized
            .parse()
            .map_err(|_| TemplateError::UnknownField(key.to_string()))
    }
}

impl FromStr for FieldKey {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| TemplateError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_form_roundtrips() {
        for field in FieldKey::ALL {
            assert_eq!(field.as_str().parse::<FieldKey>(), Ok(field));
        }
    }

    #[test]
    fn exact_parse_rejects_lowercase() {
        assert!("keep".parse::<FieldKey>().is_err());
    }

    #[test]
    fn payload_keys_are_lenient() {
        assert_eq!(FieldKey::from_payload_key("keep"), Ok(FieldKey::Keep));
        assert_eq!(FieldKey::from_payload_key("try_"), Ok(FieldKey::Try));
        assert_eq!(FieldKey::from_payload_key("css_continue"), Ok(FieldKey::CssContinue));
        assert_eq!(FieldKey::from_payload_key("logged_for"), Ok(FieldKey::LoggedFor));
        assert_eq!(
            FieldKey::from_payload_key("mood"),
            Err(TemplateError::UnknownField("mood".to_string()))
        );
    }

    #[test]
    fn serde_matches_as_str() {
        for field in FieldKey::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.as_str()));
        }
    }

    #[test]
    fn fields_know_their_template() {
        assert_eq!(FieldKey::Try.template(), TemplateKind::Kpt);
        assert_eq!(FieldKey::CssStart.template(), TemplateKind::Css);
        assert_eq!(FieldKey::LoggedFor.template(), TemplateKind::FourLs);
    }
}

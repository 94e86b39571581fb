//! Ownership data model
//!
//! Users own projects, projects hold sprints, and each sprint has at most
//! one retrospective. Every lookup in the service walks this chain back to
//! the acting user.

use chrono::{DateTime, NaiveDate, Utc};
use retro_template::{TemplateAnswers, TemplateKind};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<$name> for u64 {
            #[inline]
            fn from(id: $name) -> u64 {
                id.0
            }
        }
    };
}

id_type!(
    /// User identifier
    UserId
);
id_type!(
    /// Project identifier
    ProjectId
);
id_type!(
    /// Sprint identifier
    SprintId
);
id_type!(
    /// Retrospective identifier
    RetroId
);

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID
    #[serde(rename = "userId")]
    pub id: UserId,
    /// Login email, unique
    pub email: String,
    /// Display name
    pub nickname: String,
}

/// Project owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project ID
    #[serde(rename = "projectId")]
    pub id: ProjectId,
    /// Owning user
    #[serde(skip)]
    pub owner: UserId,
    /// Project name, unique per owner
    #[serde(rename = "projectName")]
    pub name: String,
    /// Person responsible for the project
    pub manager: String,
    /// Number of sprints created so far
    pub sprint_count: u32,
}

/// Name and manager for creating or updating a project
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    /// Project name
    #[serde(default)]
    pub project_name: String,
    /// Manager name
    #[serde(default)]
    pub manager: String,
}

impl ProjectDraft {
    /// Create new draft
    #[inline]
    pub fn new(project_name: impl Into<String>, manager: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            manager: manager.into(),
        }
    }

    /// Names of blank fields
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.project_name.trim().is_empty() {
            missing.push("project_name");
        }
        if self.manager.trim().is_empty() {
            missing.push("manager");
        }
        missing
    }
}

/// Time-boxed iteration within a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    /// Sprint ID
    #[serde(rename = "sprintId")]
    pub id: SprintId,
    /// Owning project
    #[serde(rename = "projectId")]
    pub project: ProjectId,
    /// Sprint name, used as the retrospective title
    #[serde(rename = "sprintName")]
    pub name: String,
    /// First day
    pub start_date: NaiveDate,
    /// Last day
    pub end_date: NaiveDate,
}

/// Name and period for creating a sprint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintDraft {
    /// Sprint name
    pub sprint_name: String,
    /// First day
    pub start_date: NaiveDate,
    /// Last day
    pub end_date: NaiveDate,
}

impl SprintDraft {
    /// Create new draft
    #[inline]
    pub fn new(sprint_name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            sprint_name: sprint_name.into(),
            start_date,
            end_date,
        }
    }
}

/// Retrospective recorded against a sprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrospective {
    /// Retrospective ID
    pub id: RetroId,
    /// Sprint it reflects on
    pub sprint: SprintId,
    /// Generated summary, empty until answers are submitted
    pub summary: String,
    /// Answers for the selected template
    pub answers: TemplateAnswers,
}

impl Retrospective {
    /// Template selected for this retrospective
    #[inline]
    #[must_use]
    pub fn template(&self) -> TemplateKind {
        self.answers.kind()
    }
}

/// Generated summary across a project's retrospectives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    /// Project summarized
    pub project: ProjectId,
    /// Summary text
    pub content: String,
    /// When the summary was last regenerated
    pub last_updated: DateTime<Utc>,
}

impl ProjectSummary {
    /// Summary stamped with the current time
    #[must_use]
    pub fn now(project: ProjectId, content: impl Into<String>) -> Self {
        Self {
            project,
            content: content.into(),
            last_updated: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_and_convert() {
        assert_eq!(RetroId(42).to_string(), "42");
        assert_eq!(u64::from(SprintId(3)), 3);
    }

    #[test]
    fn ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&ProjectId(9)).unwrap(), "9");
        let id: UserId = serde_json::from_str("5").unwrap();
        assert_eq!(id, UserId(5));
    }

    #[test]
    fn draft_reports_blank_fields() {
        assert!(ProjectDraft::new("Atlas", "kim").missing_fields().is_empty());
        assert_eq!(
            ProjectDraft::new(" ", "").missing_fields(),
            vec!["project_name", "manager"]
        );
    }

    #[test]
    fn project_serializes_camel_case() {
        let project = Project {
            id: ProjectId(1),
            owner: UserId(2),
            name: "Atlas".to_string(),
            manager: "kim".to_string(),
            sprint_count: 3,
        };
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "projectId": 1,
                "projectName": "Atlas",
                "manager": "kim",
                "sprintCount": 3,
            })
        );
    }

    #[test]
    fn retrospective_template_follows_answers() {
        let retro = Retrospective {
            id: RetroId(1),
            sprint: SprintId(1),
            summary: String::new(),
            answers: TemplateAnswers::empty(TemplateKind::Css),
        };
        assert_eq!(retro.template(), TemplateKind::Css);
    }
}

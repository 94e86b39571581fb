//! Error types for the retrospective service
//!
//! Provides error handling for:
//! - Caller input (template names, answers, advice requests)
//! - Ownership and existence checks
//! - Persistence collaborator failures
//! - Text-generation collaborator failures
//!
//! Every [`ServiceError`] carries a stable error code and an HTTP-style
//! status so the transport layer can build its response without matching on
//! variants.

use crate::types::{ProjectId, RetroId, SprintId, UserId};
use retro_template::{TemplateError, TemplateKind};

/// Main service error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Email already registered
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// Acting user does not exist
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Required request fields are missing or blank
    #[error("missing field data ({})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Owner already has a project with this name
    #[error("duplicate project name: {0}")]
    DuplicateProjectName(String),

    /// Project missing or not owned by the caller
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// Update would not change the project
    #[error("project data is identical to the current data")]
    UnchangedProject,

    /// Sprint ends before it starts
    #[error("invalid sprint period: {start} is after {end}")]
    InvalidSprintPeriod {
        /// Requested start date
        start: chrono::NaiveDate,
        /// Requested end date
        end: chrono::NaiveDate,
    },

    /// Sprint missing or not owned by the caller
    #[error("sprint not found: {0}")]
    SprintNotFound(SprintId),

    /// Template name is not registered
    #[error("unknown template: '{0}'")]
    UnknownTemplate(String),

    /// Answer payload does not fit the template
    #[error("invalid answer: {0}")]
    InvalidAnswer(String),

    /// Sprint already has a retrospective
    #[error("sprint {0} already has a retrospective")]
    DuplicateRetrospective(SprintId),

    /// Project has no retrospectives yet
    #[error("project {0} has no retrospectives")]
    NoRetrospectsFound(ProjectId),

    /// Retrospective missing or not owned by the caller
    #[error("retrospective not found: {0}")]
    RetrospectiveNotFound(RetroId),

    /// Advice section had no content
    #[error("no content found under {header} section")]
    EmptyExtraction {
        /// Header that was searched for
        header: String,
    },

    /// Advice requested for a field the template offers none for
    #[error("advice is not provided for '{field}' in the {template} template")]
    AdviceNotOffered {
        /// Requested field name
        field: String,
        /// Template of the request
        template: TemplateKind,
    },

    /// Retrospective was created for another template
    #[error("{requested} data not found for retrospective (selected template is {selected})")]
    TemplateMismatch {
        /// Template named in the request
        requested: TemplateKind,
        /// Template the retrospective was created with
        selected: TemplateKind,
    },

    /// Summary or advice could not be generated
    #[error("generation failed: {0}")]
    GenerationFailed(#[from] GenerationError),

    /// Persistence collaborator failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Stable error code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateEmail(_) => "1004",
            Self::UserNotFound(_) => "1005",
            Self::MissingFields(_) => "2002",
            Self::DuplicateProjectName(_) => "2003",
            Self::ProjectNotFound(_) => "2004",
            Self::UnchangedProject => "2006",
            Self::InvalidSprintPeriod { .. } => "3001",
            Self::SprintNotFound(_) => "5002",
            Self::UnknownTemplate(_) => "5003",
            Self::InvalidAnswer(_) => "5004",
            Self::DuplicateRetrospective(_) => "5006",
            Self::NoRetrospectsFound(_) => "5007",
            Self::RetrospectiveNotFound(_) => "5008",
            Self::EmptyExtraction { .. } => "5010",
            Self::AdviceNotOffered { .. } => "5011",
            Self::TemplateMismatch { .. } => "5013",
            Self::Store(_) => "9000",
            Self::GenerationFailed(_) => "9001",
        }
    }

    /// HTTP-style status
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::UserNotFound(_)
            | Self::ProjectNotFound(_)
            | Self::SprintNotFound(_)
            | Self::NoRetrospectsFound(_)
            | Self::RetrospectiveNotFound(_)
            | Self::TemplateMismatch { .. } => 404,
            Self::DuplicateRetrospective(_) => 409,
            Self::GenerationFailed(_) | Self::Store(_) => 500,
            _ => 400,
        }
    }

    /// Check if the caller can fix the request
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status() < 500
    }
}

impl From<TemplateError> for ServiceError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::UnknownTemplate(name) => Self::UnknownTemplate(name),
            TemplateError::EmptyExtraction { header } => Self::EmptyExtraction { header },
            other @ (TemplateError::FieldNotInTemplate { .. } | TemplateError::UnknownField(_)) => {
                Self::InvalidAnswer(other.to_string())
            }
        }
    }
}

/// Persistence collaborator errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Record referenced by the write does not exist
    #[error("{entity} {id} not found")]
    Missing {
        /// Record kind
        entity: &'static str,
        /// Record id
        id: u64,
    },

    /// Write would violate a uniqueness constraint
    #[error("conflict: {0}")]
    Conflict(String),

    /// Backend failure
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create missing-record error
    #[inline]
    pub fn missing(entity: &'static str, id: impl Into<u64>) -> Self {
        Self::Missing {
            entity,
            id: id.into(),
        }
    }
}

/// Text-generation collaborator errors
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// No API key configured
    #[error("no API key configured")]
    MissingApiKey,

    /// Nothing to generate from
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("service returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body excerpt
        message: String,
    },

    /// Service answered without any text
    #[error("service returned no content")]
    EmptyResponse,

    /// Collaborator-specific failure
    #[error("{0}")]
    Other(String),
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_display() {
        let err = ServiceError::MissingFields(vec!["project_name", "manager"]);
        assert_eq!(err.to_string(), "missing field data (project_name, manager)");
        assert_eq!(err.code(), "2002");
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn not_found_statuses() {
        assert_eq!(ServiceError::RetrospectiveNotFound(RetroId(7)).status(), 404);
        assert_eq!(ServiceError::RetrospectiveNotFound(RetroId(7)).code(), "5008");
        assert_eq!(ServiceError::SprintNotFound(SprintId(1)).code(), "5002");
        assert_eq!(ServiceError::DuplicateRetrospective(SprintId(1)).status(), 409);
    }

    #[test]
    fn template_errors_convert() {
        let err: ServiceError = TemplateError::UnknownTemplate("BOGUS".to_string()).into();
        assert!(matches!(err, ServiceError::UnknownTemplate(ref n) if n == "BOGUS"));
        assert_eq!(err.code(), "5003");

        let err: ServiceError = TemplateError::empty_extraction("## Stop").into();
        assert_eq!(err.code(), "5010");
        assert_eq!(err.to_string(), "no content found under ## Stop section");

        let err: ServiceError = TemplateError::UnknownField("mood".to_string()).into();
        assert!(matches!(err, ServiceError::InvalidAnswer(_)));
    }

    #[test]
    fn server_side_errors() {
        let err: ServiceError = GenerationError::EmptyResponse.into();
        assert_eq!(err.status(), 500);
        assert!(!err.is_client_error());

        let err: ServiceError = StoreError::Backend("down".to_string()).into();
        assert_eq!(err.code(), "9000");
    }

    #[test]
    fn store_error_display() {
        let err = StoreError::missing("sprint", 3u64);
        assert_eq!(err.to_string(), "sprint 3 not found");
    }
}

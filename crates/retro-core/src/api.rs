//! Request and response payloads
//!
//! Everything here is serialized in camelCase. Successful and failed
//! operations share the [`ApiResponse`] envelope.

use crate::error::{ServiceError, ServiceResult};
use crate::types::{ProjectId, RetroId, SprintId};
use indexmap::IndexMap;
use retro_template::TemplateKind;
use serde::{Deserialize, Serialize};

/// Uniform response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// True when the operation succeeded
    pub success: bool,
    /// Operation result
    pub response: Option<T>,
    /// Failure detail
    pub error: Option<ErrorDetail>,
}

impl<T> ApiResponse<T> {
    /// Successful response
    #[inline]
    pub fn ok(response: T) -> Self {
        Self {
            success: true,
            response: Some(response),
            error: None,
        }
    }

    /// Failed response
    #[must_use]
    pub fn fail(err: &ServiceError) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(ErrorDetail::from(err)),
        }
    }

    /// Envelope for either outcome
    pub fn from_result(result: ServiceResult<T>) -> Self {
        match result {
            Ok(response) => Self::ok(response),
            Err(err) => Self::fail(&err),
        }
    }
}

/// Error code, reason and status of a failed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// Stable error code
    pub code: String,
    /// Human-readable reason
    pub reason: String,
    /// HTTP-style status
    pub status: u16,
}

impl From<&ServiceError> for ErrorDetail {
    fn from(err: &ServiceError) -> Self {
        Self {
            code: err.code().to_string(),
            reason: err.to_string(),
            status: err.status(),
        }
    }
}

/// Template choice for a sprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSelection {
    /// Sprint the retrospective is for
    pub sprint_id: SprintId,
    /// Unvalidated template name
    pub temp_name: String,
}

/// Answer submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetroUpdate {
    /// Retrospective to update
    pub retro_id: RetroId,
    /// Unvalidated template name, must match the selected one
    pub temp_name: String,
    /// Document or per-field answers
    pub answer: AnswerPayload,
}

/// Answers as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerPayload {
    /// Whole `## Section` document
    Document(String),
    /// Values keyed by field name
    Fields(IndexMap<String, String>),
}

impl From<&str> for AnswerPayload {
    fn from(doc: &str) -> Self {
        Self::Document(doc.to_string())
    }
}

impl From<String> for AnswerPayload {
    fn from(doc: String) -> Self {
        Self::Document(doc)
    }
}

/// Request for advice on the template's advice section
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    /// Unvalidated template name
    pub temp_name: String,
    /// Field the advice is for; defaults to the template's advice section
    #[serde(default)]
    pub field_name: Option<String>,
    /// Field text or whole document
    #[serde(default)]
    pub field_value: Option<String>,
}

impl AdviceRequest {
    /// Create new request
    #[inline]
    pub fn new(temp_name: impl Into<String>, field_value: impl Into<String>) -> Self {
        Self {
            temp_name: temp_name.into(),
            field_name: None,
            field_value: Some(field_value.into()),
        }
    }

    /// With explicit field name
    #[inline]
    #[must_use]
    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }
}

/// Result of selecting a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedTemplate {
    /// Created retrospective
    pub retro_id: RetroId,
    /// Template it was created with
    pub template: TemplateKind,
}

/// Result of an answer submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetroUpdated {
    /// Updated retrospective
    pub retro_id: RetroId,
}

/// Retrospectives of one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRetrospectives {
    /// Project listed
    pub project_id: ProjectId,
    /// Project summary or a placeholder
    pub summary: String,
    /// One row per retrospective
    pub retrospects: Vec<RetrospectiveRow>,
}

/// Listing row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrospectiveRow {
    /// Retrospective ID
    pub retro_id: RetroId,
    /// Sprint ID
    pub sprint_id: SprintId,
    /// Sprint name
    pub sprint_name: String,
    /// First day as `YYYY.MM.DD`
    pub start_date: String,
    /// Last day as `YYYY.MM.DD`
    pub end_date: String,
    /// Selected template
    pub temp_name: TemplateKind,
    /// Project manager
    pub manager: String,
}

/// Rendered retrospective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrospectiveDetail {
    /// Sprint name
    pub sprint_name: String,
    /// Selected template
    pub temp_name: TemplateKind,
    /// Rendered document
    pub answer: String,
}

/// Generated advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    /// Advice text
    pub advice: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ok_envelope() {
        let json = serde_json::to_value(ApiResponse::ok(RetroUpdated { retro_id: RetroId(4) })).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "response": { "retroId": 4 },
                "error": null,
            })
        );
    }

    #[test]
    fn failed_envelope_carries_code_and_status() {
        let resp: ApiResponse<Advice> =
            ApiResponse::from_result(Err(ServiceError::UnknownTemplate("BOGUS".to_string())));
        assert!(!resp.success);
        let detail = resp.error.unwrap();
        assert_eq!(detail.code, "5003");
        assert_eq!(detail.status, 400);
        assert_eq!(detail.reason, "unknown template: 'BOGUS'");
    }

    #[test]
    fn answer_payload_is_untagged() {
        let update: RetroUpdate = serde_json::from_value(serde_json::json!({
            "retroId": 1,
            "tempName": "KPT",
            "answer": "## Keep\nx",
        }))
        .unwrap();
        assert_eq!(update.answer, AnswerPayload::Document("## Keep\nx".to_string()));

        let update: RetroUpdate = serde_json::from_value(serde_json::json!({
            "retroId": 1,
            "tempName": "KPT",
            "answer": { "keep": "x", "try_": "y" },
        }))
        .unwrap();
        let AnswerPayload::Fields(fields) = update.answer else {
            panic!("expected field map");
        };
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["keep", "try_"]);
    }

    #[test]
    fn advice_request_optional_fields() {
        let req: AdviceRequest = serde_json::from_str(r#"{"tempName":"CSS"}"#).unwrap();
        assert_eq!(req.field_value, None);
        assert_eq!(req.field_name, None);

        let req = AdviceRequest::new("KPT", "text").with_field_name("PROBLEM");
        assert_eq!(req.field_name.as_deref(), Some("PROBLEM"));
    }

    #[test]
    fn template_names_on_the_wire() {
        let row = RetrospectiveDetail {
            sprint_name: "S1".to_string(),
            temp_name: TemplateKind::FourLs,
            answer: String::new(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["tempName"], "FOUR_LS");
        assert_eq!(json["sprintName"], "S1");
    }
}

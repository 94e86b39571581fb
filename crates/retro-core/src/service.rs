//! Retrospective service
//!
//! Every operation that touches stored records takes the acting user and
//! walks retrospective → sprint → project → owner before doing anything. A
//! record owned by someone else is reported exactly like a missing one.
//!
//! # Answer submission
//!
//! ```text
//! RetroUpdate → ownership → template check → parse/rename → save answers
//!                                                               ↓
//!          upsert project summary ← summarize project ← summarize sprint
//! ```

use crate::adapters::{advice_field_matches, advice_text, answer_from_payload};
use crate::api::{
    Advice, AdviceRequest, ProjectRetrospectives, RetroUpdate, RetroUpdated, RetrospectiveDetail,
    RetrospectiveRow, SelectedTemplate, TemplateSelection,
};
use crate::config::RetroConfig;
use crate::error::{GenerationError, ServiceError, ServiceResult, StoreError};
use crate::generation::{AdviceGenerator, Summarizer};
use crate::openai::OpenAiClient;
use crate::store::{MemoryStore, RetroStore};
use crate::types::{
    Project, ProjectDraft, ProjectId, ProjectSummary, RetroId, Retrospective, Sprint, SprintDraft,
    SprintId, User, UserId,
};
use retro_template::{render_answers, TemplateAnswers, TemplateKind};
use std::sync::Arc;

/// Listing summary when a project has none yet
pub const NO_SUMMARY: &str = "No summary available.";

/// Date layout used in listings
pub const DATE_FORMAT: &str = "%Y.%m.%d";

/// Retrospective service over pluggable collaborators
#[derive(Clone)]
pub struct RetroService {
    store: Arc<dyn RetroStore>,
    summarizer: Arc<dyn Summarizer>,
    advisor: Arc<dyn AdviceGenerator>,
}

impl std::fmt::Debug for RetroService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetroService").finish_non_exhaustive()
    }
}

impl RetroService {
    /// Create service
    pub fn new(
        store: Arc<dyn RetroStore>,
        summarizer: Arc<dyn Summarizer>,
        advisor: Arc<dyn AdviceGenerator>,
    ) -> Self {
        Self {
            store,
            summarizer,
            advisor,
        }
    }

    /// In-memory service backed by the chat-completions client
    ///
    /// # Errors
    /// `GenerationError::Http` if the HTTP client cannot be built
    pub fn from_config(config: &RetroConfig) -> Result<Self, GenerationError> {
        let client = Arc::new(OpenAiClient::new(config.generation.clone())?);
        Ok(Self::new(Arc::new(MemoryStore::new()), client.clone(), client))
    }

    /// Persistence collaborator
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<dyn RetroStore> {
        &self.store
    }

    // ---- users ----

    /// Register a user
    ///
    /// # Errors
    /// `MissingFields` for blank input, `DuplicateEmail` if the email is taken
    pub async fn register_user(&self, email: &str, nickname: &str) -> ServiceResult<User> {
        let mut missing = Vec::new();
        if email.trim().is_empty() {
            missing.push("email");
        }
        if nickname.trim().is_empty() {
            missing.push("nickname");
        }
        if !missing.is_empty() {
            return Err(ServiceError::MissingFields(missing));
        }

        let user = self
            .store
            .insert_user(email.trim(), nickname.trim())
            .await
            .map_err(|err| match err {
                StoreError::Conflict(_) => ServiceError::DuplicateEmail(email.trim().to_string()),
                other => other.into(),
            })?;
        tracing::info!(user = %user.id, "user registered");
        Ok(user)
    }

    // ---- projects ----

    /// Create a project
    ///
    /// # Errors
    /// `UserNotFound`, `MissingFields` or `DuplicateProjectName`
    pub async fn create_project(&self, user: UserId, draft: &ProjectDraft) -> ServiceResult<Project> {
        self.ensure_user(user).await?;
        let (name, manager) = validated_draft(draft)?;

        let project = self
            .store
            .insert_project(user, name, manager)
            .await
            .map_err(|err| duplicate_name(err, name))?;
        tracing::info!(user = %user, project = %project.id, "project created");
        Ok(project)
    }

    /// Projects of the acting user
    ///
    /// # Errors
    /// `UserNotFound`
    pub async fn list_projects(&self, user: UserId) -> ServiceResult<Vec<Project>> {
        self.ensure_user(user).await?;
        Ok(self.store.projects_for(user).await?)
    }

    /// Change a project's name and manager
    ///
    /// # Errors
    /// `ProjectNotFound`, `MissingFields`, `UnchangedProject` or
    /// `DuplicateProjectName`
    pub async fn update_project(
        &self,
        user: UserId,
        project: ProjectId,
        draft: &ProjectDraft,
    ) -> ServiceResult<Project> {
        let current = self.owned_project(user, project).await?;
        let (name, manager) = validated_draft(draft)?;
        if current.name == name && current.manager == manager {
            return Err(ServiceError::UnchangedProject);
        }

        let updated = Project {
            name: name.to_string(),
            manager: manager.to_string(),
            ..current
        };
        self.store
            .update_project(&updated)
            .await
            .map_err(|err| duplicate_name(err, name))?;
        tracing::info!(user = %user, project = %project, "project updated");
        Ok(updated)
    }

    /// Delete a project with everything below it
    ///
    /// # Errors
    /// `ProjectNotFound`
    pub async fn delete_project(&self, user: UserId, project: ProjectId) -> ServiceResult<()> {
        self.owned_project(user, project).await?;
        self.store.delete_project(project).await?;
        tracing::info!(user = %user, project = %project, "project deleted");
        Ok(())
    }

    // ---- sprints ----

    /// Create a sprint
    ///
    /// # Errors
    /// `ProjectNotFound`, `MissingFields` or `InvalidSprintPeriod`
    pub async fn create_sprint(
        &self,
        user: UserId,
        project: ProjectId,
        draft: &SprintDraft,
    ) -> ServiceResult<Sprint> {
        self.owned_project(user, project).await?;
        if draft.sprint_name.trim().is_empty() {
            return Err(ServiceError::MissingFields(vec!["sprint_name"]));
        }
        if draft.start_date > draft.end_date {
            return Err(ServiceError::InvalidSprintPeriod {
                start: draft.start_date,
                end: draft.end_date,
            });
        }

        let draft = SprintDraft {
            sprint_name: draft.sprint_name.trim().to_string(),
            ..draft.clone()
        };
        let sprint = self.store.insert_sprint(project, &draft).await?;
        tracing::info!(user = %user, project = %project, sprint = %sprint.id, "sprint created");
        Ok(sprint)
    }

    /// Sprints of a project
    ///
    /// # Errors
    /// `ProjectNotFound`
    pub async fn list_sprints(&self, user: UserId, project: ProjectId) -> ServiceResult<Vec<Sprint>> {
        self.owned_project(user, project).await?;
        Ok(self.store.sprints_for(project).await?)
    }

    // ---- retrospectives ----

    /// Start a retrospective for a sprint with the named template
    ///
    /// The name is validated before anything is written.
    ///
    /// # Errors
    /// `UnknownTemplate`, `SprintNotFound` or `DuplicateRetrospective`
    pub async fn select_template(
        &self,
        user: UserId,
        selection: &TemplateSelection,
    ) -> ServiceResult<SelectedTemplate> {
        let kind = TemplateKind::from_name(&selection.temp_name)?;
        let sprint = self.owned_sprint(user, selection.sprint_id).await?;

        let retro = self
            .store
            .insert_retrospective(sprint.id, TemplateAnswers::empty(kind))
            .await
            .map_err(|err| match err {
                StoreError::Conflict(_) => ServiceError::DuplicateRetrospective(sprint.id),
                other => other.into(),
            })?;
        tracing::info!(user = %user, sprint = %sprint.id, retro = %retro.id, template = %kind, "template selected");
        Ok(SelectedTemplate {
            retro_id: retro.id,
            template: kind,
        })
    }

    /// Save answers, then regenerate the sprint and project summaries
    ///
    /// # Errors
    /// `RetrospectiveNotFound`, `UnknownTemplate`, `TemplateMismatch`,
    /// `InvalidAnswer` for a bad field map, `GenerationFailed` if a summary
    /// cannot be produced
    pub async fn update_retrospective(
        &self,
        user: UserId,
        update: &RetroUpdate,
    ) -> ServiceResult<RetroUpdated> {
        let (retro, sprint) = self.owned_retrospective(user, update.retro_id).await?;
        let kind = TemplateKind::from_name(&update.temp_name)?;
        if kind != retro.template() {
            return Err(ServiceError::TemplateMismatch {
                requested: kind,
                selected: retro.template(),
            });
        }

        let parsed = answer_from_payload(kind, &update.answer)?;
        self.store
            .save_answers(retro.id, TemplateAnswers::from(&parsed))
            .await?;
        tracing::info!(user = %user, retro = %retro.id, "answers saved");

        let summary = self
            .summarizer
            .summarize_sprint(kind, &parsed)
            .await
            .map_err(|err| {
                tracing::warn!(retro = %retro.id, error = %err, "sprint summary failed");
                err
            })?;
        self.store.save_summary(retro.id, &summary).await?;

        self.refresh_project_summary(sprint.project).await?;
        Ok(RetroUpdated { retro_id: retro.id })
    }

    /// Regenerate a project's summary from its non-empty sprint summaries
    ///
    /// Does nothing when no sprint has a summary yet.
    ///
    /// # Errors
    /// `GenerationFailed` or a store error
    async fn refresh_project_summary(&self, project: ProjectId) -> ServiceResult<()> {
        let summaries: Vec<String> = self
            .store
            .retrospectives_for(project)
            .await?
            .into_iter()
            .map(|(retro, _)| retro.summary)
            .filter(|summary| !summary.trim().is_empty())
            .collect();
        if summaries.is_empty() {
            tracing::debug!(project = %project, "no sprint summaries, project summary left as is");
            return Ok(());
        }

        let content = self
            .summarizer
            .summarize_project(&summaries)
            .await
            .map_err(|err| {
                tracing::warn!(project = %project, error = %err, "project summary failed");
                err
            })?;
        self.store
            .upsert_project_summary(ProjectSummary::now(project, content))
            .await?;
        tracing::info!(project = %project, sprints = summaries.len(), "project summary refreshed");
        Ok(())
    }

    /// Project summary and one row per retrospective
    ///
    /// # Errors
    /// `ProjectNotFound` or `NoRetrospectsFound`
    pub async fn list_retrospectives(
        &self,
        user: UserId,
        project: ProjectId,
    ) -> ServiceResult<ProjectRetrospectives> {
        let owned = self.owned_project(user, project).await?;
        let summary = self
            .store
            .project_summary(project)
            .await?
            .map_or_else(|| NO_SUMMARY.to_string(), |s| s.content);

        let rows = self.store.retrospectives_for(project).await?;
        if rows.is_empty() {
            return Err(ServiceError::NoRetrospectsFound(project));
        }

        let retrospects = rows
            .into_iter()
            .map(|(retro, sprint)| RetrospectiveRow {
                retro_id: retro.id,
                sprint_id: sprint.id,
                sprint_name: sprint.name,
                start_date: sprint.start_date.format(DATE_FORMAT).to_string(),
                end_date: sprint.end_date.format(DATE_FORMAT).to_string(),
                temp_name: retro.template(),
                manager: owned.manager.clone(),
            })
            .collect();

        Ok(ProjectRetrospectives {
            project_id: project,
            summary,
            retrospects,
        })
    }

    /// Rendered retrospective
    ///
    /// # Errors
    /// `RetrospectiveNotFound`
    pub async fn retrospective_detail(
        &self,
        user: UserId,
        retro: RetroId,
    ) -> ServiceResult<RetrospectiveDetail> {
        let (retro, sprint) = self.owned_retrospective(user, retro).await?;
        Ok(RetrospectiveDetail {
            answer: render_answers(&sprint.name, &retro.answers),
            temp_name: retro.template(),
            sprint_name: sprint.name,
        })
    }

    // ---- advice ----

    /// Advice on the template's advice section
    ///
    /// Reads no stored records.
    ///
    /// # Errors
    /// `UnknownTemplate`, `MissingFields` for an empty value,
    /// `AdviceNotOffered`, `EmptyExtraction` or `GenerationFailed`
    pub async fn advice(&self, request: &AdviceRequest) -> ServiceResult<Advice> {
        let kind = TemplateKind::from_name(&request.temp_name)?;
        let value = request
            .field_value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ServiceError::MissingFields(vec!["field_value"]))?;

        let spec = kind.spec();
        if let Some(field) = &request.field_name {
            if !advice_field_matches(spec, field) {
                return Err(ServiceError::AdviceNotOffered {
                    field: field.clone(),
                    template: kind,
                });
            }
        }

        let text = advice_text(spec, value)?;
        let header = spec.advice_section().header();
        let advice = self
            .advisor
            .advise(kind, header, &text)
            .await
            .map_err(|err| {
                tracing::warn!(template = %kind, error = %err, "advice failed");
                err
            })?;
        tracing::info!(template = %kind, "advice generated");
        Ok(Advice { advice })
    }

    // ---- ownership ----

    async fn ensure_user(&self, user: UserId) -> ServiceResult<()> {
        match self.store.user(user).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::UserNotFound(user)),
        }
    }

    async fn owned_project(&self, user: UserId, project: ProjectId) -> ServiceResult<Project> {
        self.store
            .project(project)
            .await?
            .filter(|p| p.owner == user)
            .ok_or(ServiceError::ProjectNotFound(project))
    }

    async fn owned_sprint(&self, user: UserId, sprint: SprintId) -> ServiceResult<Sprint> {
        let found = self
            .store
            .sprint(sprint)
            .await?
            .ok_or(ServiceError::SprintNotFound(sprint))?;
        match self.owned_project(user, found.project).await {
            Ok(_) => Ok(found),
            Err(ServiceError::ProjectNotFound(_)) => Err(ServiceError::SprintNotFound(sprint)),
            Err(other) => Err(other),
        }
    }

    async fn owned_retrospective(
        &self,
        user: UserId,
        retro: RetroId,
    ) -> ServiceResult<(Retrospective, Sprint)> {
        let found = self
            .store
            .retrospective(retro)
            .await?
            .ok_or(ServiceError::RetrospectiveNotFound(retro))?;
        match self.owned_sprint(user, found.sprint).await {
            Ok(sprint) => Ok((found, sprint)),
            Err(ServiceError::SprintNotFound(_)) => Err(ServiceError::RetrospectiveNotFound(retro)),
            Err(other) => Err(other),
        }
    }
}

fn validated_draft(draft: &ProjectDraft) -> ServiceResult<(&str, &str)> {
    let missing = draft.missing_fields();
    if !missing.is_empty() {
        return Err(ServiceError::MissingFields(missing));
    }
    Ok((draft.project_name.trim(), draft.manager.trim()))
}

fn duplicate_name(err: StoreError, name: &str) -> ServiceError {
    match err {
        StoreError::Conflict(_) => ServiceError::DuplicateProjectName(name.to_string()),
        other => other.into(),
    }
}

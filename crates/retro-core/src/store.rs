//! Persistence collaborator
//!
//! [`RetroStore`] is the seam the service writes through. [`MemoryStore`]
//! keeps everything in concurrent maps and enforces the uniqueness rules
//! itself, so concurrent callers cannot both win:
//!
//! - one account per email
//! - one project name per owner
//! - one retrospective per sprint

use crate::error::StoreError;
use crate::types::{
    Project, ProjectId, ProjectSummary, RetroId, Retrospective, Sprint, SprintDraft, SprintId,
    User, UserId,
};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use retro_template::TemplateAnswers;
use std::sync::atomic::{AtomicU64, Ordering};

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage for the ownership model
#[async_trait]
pub trait RetroStore: Send + Sync {
    /// Create a user; `Conflict` if the email is taken
    async fn insert_user(&self, email: &str, nickname: &str) -> StoreResult<User>;

    /// Look up a user
    async fn user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Create a project; `Conflict` if the owner already uses the name
    async fn insert_project(&self, owner: UserId, name: &str, manager: &str) -> StoreResult<Project>;

    /// Look up a project
    async fn project(&self, id: ProjectId) -> StoreResult<Option<Project>>;

    /// Projects of an owner, oldest first
    async fn projects_for(&self, owner: UserId) -> StoreResult<Vec<Project>>;

    /// Replace name and manager; `Conflict` if the new name is taken
    async fn update_project(&self, project: &Project) -> StoreResult<()>;

    /// Remove a project with its sprints, retrospectives and summary
    async fn delete_project(&self, id: ProjectId) -> StoreResult<()>;

    /// Create a sprint and bump the project's sprint count
    async fn insert_sprint(&self, project: ProjectId, draft: &SprintDraft) -> StoreResult<Sprint>;

    /// Look up a sprint
    async fn sprint(&self, id: SprintId) -> StoreResult<Option<Sprint>>;

    /// Sprints of a project, oldest first
    async fn sprints_for(&self, project: ProjectId) -> StoreResult<Vec<Sprint>>;

    /// Create a retrospective; `Conflict` if the sprint already has one
    async fn insert_retrospective(
        &self,
        sprint: SprintId,
        answers: TemplateAnswers,
    ) -> StoreResult<Retrospective>;

    /// Look up a retrospective
    async fn retrospective(&self, id: RetroId) -> StoreResult<Option<Retrospective>>;

    /// Replace the answers of a retrospective
    async fn save_answers(&self, id: RetroId, answers: TemplateAnswers) -> StoreResult<()>;

    /// Replace the summary of a retrospective
    async fn save_summary(&self, id: RetroId, summary: &str) -> StoreResult<()>;

    /// Retrospectives of a project with their sprints, in sprint order
    async fn retrospectives_for(
        &self,
        project: ProjectId,
    ) -> StoreResult<Vec<(Retrospective, Sprint)>>;

    /// Current project summary
    async fn project_summary(&self, project: ProjectId) -> StoreResult<Option<ProjectSummary>>;

    /// Insert or replace the project summary
    async fn upsert_project_summary(&self, summary: ProjectSummary) -> StoreResult<()>;
}

/// In-memory [`RetroStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    next_id: AtomicU64,
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
    projects: DashMap<ProjectId, Project>,
    project_names: DashMap<(UserId, String), ProjectId>,
    sprints: DashMap<SprintId, Sprint>,
    retrospectives: DashMap<RetroId, Retrospective>,
    retro_by_sprint: DashMap<SprintId, RetroId>,
    summaries: DashMap<ProjectId, ProjectSummary>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids are unique across all record kinds and start at 1
    fn issue_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Number of stored retrospectives
    #[must_use]
    pub fn retrospective_count(&self) -> usize {
        self.retrospectives.len()
    }
}

#[async_trait]
impl RetroStore for MemoryStore {
    async fn insert_user(&self, email: &str, nickname: &str) -> StoreResult<User> {
        let id = match self.emails.entry(email.to_string()) {
            Entry::Occupied(_) => {
                return Err(StoreError::Conflict(format!("email {email} is registered")));
            }
            Entry::Vacant(slot) => {
                let id = UserId(self.issue_id());
                slot.insert(id);
                id
            }
        };

        let user = User {
            id,
            email: email.to_string(),
            nickname: nickname.to_string(),
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn insert_project(&self, owner: UserId, name: &str, manager: &str) -> StoreResult<Project> {
        let id = match self.project_names.entry((owner, name.to_string())) {
            Entry::Occupied(_) => {
                return Err(StoreError::Conflict(format!("project name {name} is taken")));
            }
            Entry::Vacant(slot) => {
                let id = ProjectId(self.issue_id());
                slot.insert(id);
                id
            }
        };

        let project = Project {
            id,
            owner,
            name: name.to_string(),
            manager: manager.to_string(),
            sprint_count: 0,
        };
        self.projects.insert(id, project.clone());
        Ok(project)
    }

    async fn project(&self, id: ProjectId) -> StoreResult<Option<Project>> {
        Ok(self.projects.get(&id).map(|p| p.clone()))
    }

    async fn projects_for(&self, owner: UserId) -> StoreResult<Vec<Project>> {
        let mut projects: Vec<Project> = self
            .projects
            .iter()
            .filter(|p| p.owner == owner)
            .map(|p| p.clone())
            .collect();
        projects.sort_by_key(|p| p.id);
        Ok(projects)
    }

    async fn update_project(&self, project: &Project) -> StoreResult<()> {
        // Held until the name index and the record agree, so renames of one
        // project commit one at a time.
        let mut stored = self
            .projects
            .get_mut(&project.id)
            .ok_or_else(|| StoreError::missing("project", project.id))?;

        if stored.name != project.name {
            match self.project_names.entry((stored.owner, project.name.clone())) {
                Entry::Occupied(_) => {
                    return Err(StoreError::Conflict(format!(
                        "project name {} is taken",
                        project.name
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(project.id);
                }
            }
            self.project_names.remove(&(stored.owner, stored.name.clone()));
        }

        stored.name.clone_from(&project.name);
        stored.manager.clone_from(&project.manager);
        Ok(())
    }

    async fn delete_project(&self, id: ProjectId) -> StoreResult<()> {
        let (_, project) = self
            .projects
            .remove(&id)
            .ok_or_else(|| StoreError::missing("project", id))?;
        self.project_names.remove(&(project.owner, project.name));

        let sprint_ids: Vec<SprintId> = self
            .sprints
            .iter()
            .filter(|s| s.project == id)
            .map(|s| s.id)
            .collect();
        for sprint in sprint_ids {
            self.sprints.remove(&sprint);
            if let Some((_, retro)) = self.retro_by_sprint.remove(&sprint) {
                self.retrospectives.remove(&retro);
            }
        }
        self.summaries.remove(&id);
        Ok(())
    }

    async fn insert_sprint(&self, project: ProjectId, draft: &SprintDraft) -> StoreResult<Sprint> {
        {
            let mut stored = self
                .projects
                .get_mut(&project)
                .ok_or_else(|| StoreError::missing("project", project))?;
            stored.sprint_count += 1;
        }

        let sprint = Sprint {
            id: SprintId(self.issue_id()),
            project,
            name: draft.sprint_name.clone(),
            start_date: draft.start_date,
            end_date: draft.end_date,
        };
        self.sprints.insert(sprint.id, sprint.clone());
        Ok(sprint)
    }

    async fn sprint(&self, id: SprintId) -> StoreResult<Option<Sprint>> {
        Ok(self.sprints.get(&id).map(|s| s.clone()))
    }

    async fn sprints_for(&self, project: ProjectId) -> StoreResult<Vec<Sprint>> {
        let mut sprints: Vec<Sprint> = self
            .sprints
            .iter()
            .filter(|s| s.project == project)
            .map(|s| s.clone())
            .collect();
        sprints.sort_by_key(|s| s.id);
        Ok(sprints)
    }

    async fn insert_retrospective(
        &self,
        sprint: SprintId,
        answers: TemplateAnswers,
    ) -> StoreResult<Retrospective> {
        if !self.sprints.contains_key(&sprint) {
            return Err(StoreError::missing("sprint", sprint));
        }

        let id = match self.retro_by_sprint.entry(sprint) {
            Entry::Occupied(_) => {
                return Err(StoreError::Conflict(format!("sprint {sprint} has a retrospective")));
            }
            Entry::Vacant(slot) => {
                let id = RetroId(self.issue_id());
                slot.insert(id);
                id
            }
        };

        let retro = Retrospective {
            id,
            sprint,
            summary: String::new(),
            answers,
        };
        self.retrospectives.insert(id, retro.clone());
        Ok(retro)
    }

    async fn retrospective(&self, id: RetroId) -> StoreResult<Option<Retrospective>> {
        Ok(self.retrospectives.get(&id).map(|r| r.clone()))
    }

    async fn save_answers(&self, id: RetroId, answers: TemplateAnswers) -> StoreResult<()> {
        let mut retro = self
            .retrospectives
            .get_mut(&id)
            .ok_or_else(|| StoreError::missing("retrospective", id))?;
        retro.answers = answers;
        Ok(())
    }

    async fn save_summary(&self, id: RetroId, summary: &str) -> StoreResult<()> {
        let mut retro = self
            .retrospectives
            .get_mut(&id)
            .ok_or_else(|| StoreError::missing("retrospective", id))?;
        summary.clone_into(&mut retro.summary);
        Ok(())
    }

    async fn retrospectives_for(
        &self,
        project: ProjectId,
    ) -> StoreResult<Vec<(Retrospective, Sprint)>> {
        let sprints = self.sprints_for(project).await?;
        let rows = sprints
            .into_iter()
            .filter_map(|sprint| {
                let retro_id = *self.retro_by_sprint.get(&sprint.id)?;
                let retro = self.retrospectives.get(&retro_id)?.clone();
                Some((retro, sprint))
            })
            .collect();
        Ok(rows)
    }

    async fn project_summary(&self, project: ProjectId) -> StoreResult<Option<ProjectSummary>> {
        Ok(self.summaries.get(&project).map(|s| s.clone()))
    }

    async fn upsert_project_summary(&self, summary: ProjectSummary) -> StoreResult<()> {
        if !self.projects.contains_key(&summary.project) {
            return Err(StoreError::missing("project", summary.project));
        }
        self.summaries.insert(summary.project, summary);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use retro_template::TemplateKind;
    use std::sync::Arc;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    async fn project_with_sprint(store: &MemoryStore) -> (Project, Sprint) {
        let user = store.insert_user("a@example.com", "a").await.unwrap();
        let project = store.insert_project(user.id, "Atlas", "kim").await.unwrap();
        let sprint = store
            .insert_sprint(project.id, &SprintDraft::new("S1", date(1), date(14)))
            .await
            .unwrap();
        (project, sprint)
    }

    #[tokio::test]
    async fn emails_are_unique() {
        let store = MemoryStore::new();
        store.insert_user("a@example.com", "a").await.unwrap();
        let err = store.insert_user("a@example.com", "b").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn project_names_are_unique_per_owner() {
        let store = MemoryStore::new();
        let a = store.insert_user("a@example.com", "a").await.unwrap();
        let b = store.insert_user("b@example.com", "b").await.unwrap();

        store.insert_project(a.id, "Atlas", "kim").await.unwrap();
        assert!(store.insert_project(a.id, "Atlas", "lee").await.is_err());
        assert!(store.insert_project(b.id, "Atlas", "lee").await.is_ok());
    }

    #[tokio::test]
    async fn rename_moves_name_index() {
        let store = MemoryStore::new();
        let user = store.insert_user("a@example.com", "a").await.unwrap();
        let mut atlas = store.insert_project(user.id, "Atlas", "kim").await.unwrap();
        store.insert_project(user.id, "Borealis", "kim").await.unwrap();

        atlas.name = "Borealis".to_string();
        assert!(matches!(
            store.update_project(&atlas).await,
            Err(StoreError::Conflict(_))
        ));

        atlas.name = "Cygnus".to_string();
        store.update_project(&atlas).await.unwrap();
        assert!(store.insert_project(user.id, "Atlas", "kim").await.is_ok());
        assert_eq!(store.project(atlas.id).await.unwrap().unwrap().name, "Cygnus");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_renames_leave_one_name_reserved() {
        let store = Arc::new(MemoryStore::new());
        let user = store.insert_user("a@example.com", "a").await.unwrap();
        let project = store.insert_project(user.id, "Atlas", "kim").await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                let mut renamed = project.clone();
                renamed.name = format!("Atlas {i}");
                tokio::spawn(async move { store.update_project(&renamed).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let current = store.project(project.id).await.unwrap().unwrap();
        let reserved: Vec<String> = store
            .project_names
            .iter()
            .filter(|entry| entry.key().0 == user.id)
            .map(|entry| entry.key().1.clone())
            .collect();
        assert_eq!(reserved, [current.name.clone()]);
        assert_eq!(
            store.project_names.get(&(user.id, current.name)).map(|id| *id),
            Some(project.id)
        );
        assert!(store.insert_project(user.id, "Atlas", "kim").await.is_ok());
    }

    #[tokio::test]
    async fn sprint_creation_bumps_count() {
        let store = MemoryStore::new();
        let (project, _) = project_with_sprint(&store).await;
        store
            .insert_sprint(project.id, &SprintDraft::new("S2", date(15), date(28)))
            .await
            .unwrap();

        assert_eq!(store.project(project.id).await.unwrap().unwrap().sprint_count, 2);
        let names: Vec<_> = store
            .sprints_for(project.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["S1", "S2"]);
    }

    #[tokio::test]
    async fn sprint_for_missing_project_fails() {
        let store = MemoryStore::new();
        let err = store
            .insert_sprint(ProjectId(99), &SprintDraft::new("S1", date(1), date(2)))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::missing("project", 99u64));
    }

    #[tokio::test]
    async fn one_retrospective_per_sprint() {
        let store = MemoryStore::new();
        let (_, sprint) = project_with_sprint(&store).await;

        store
            .insert_retrospective(sprint.id, TemplateAnswers::empty(TemplateKind::Kpt))
            .await
            .unwrap();
        let err = store
            .insert_retrospective(sprint.id, TemplateAnswers::empty(TemplateKind::Css))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.retrospective_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_inserts_for_one_sprint_have_one_winner() {
        let store = Arc::new(MemoryStore::new());
        let (_, sprint) = project_with_sprint(&store).await;

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .insert_retrospective(sprint.id, TemplateAnswers::empty(TemplateKind::Kpt))
                        .await
                        .is_ok()
                })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(store.retrospective_count(), 1);
    }

    #[tokio::test]
    async fn answers_and_summary_are_saved() {
        let store = MemoryStore::new();
        let (project, sprint) = project_with_sprint(&store).await;
        let retro = store
            .insert_retrospective(sprint.id, TemplateAnswers::empty(TemplateKind::Kpt))
            .await
            .unwrap();

        let mut answers = TemplateAnswers::empty(TemplateKind::Kpt);
        answers.set(retro_template::FieldKey::Keep, "pairing").unwrap();
        store.save_answers(retro.id, answers.clone()).await.unwrap();
        store.save_summary(retro.id, "went well").await.unwrap();

        let rows = store.retrospectives_for(project.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0.answers, answers);
        assert_eq!(rows[0].0.summary, "went well");
        assert_eq!(rows[0].1, sprint);
    }

    #[tokio::test]
    async fn delete_cascades() {
        let store = MemoryStore::new();
        let (project, sprint) = project_with_sprint(&store).await;
        let retro = store
            .insert_retrospective(sprint.id, TemplateAnswers::empty(TemplateKind::Kpt))
            .await
            .unwrap();
        store
            .upsert_project_summary(ProjectSummary::now(project.id, "summary"))
            .await
            .unwrap();

        store.delete_project(project.id).await.unwrap();

        assert!(store.project(project.id).await.unwrap().is_none());
        assert!(store.sprint(sprint.id).await.unwrap().is_none());
        assert!(store.retrospective(retro.id).await.unwrap().is_none());
        assert!(store.project_summary(project.id).await.unwrap().is_none());
        assert!(store.insert_project(project.owner, "Atlas", "kim").await.is_ok());
    }

    #[tokio::test]
    async fn summary_upsert_replaces() {
        let store = MemoryStore::new();
        let (project, _) = project_with_sprint(&store).await;

        store
            .upsert_project_summary(ProjectSummary::now(project.id, "first"))
            .await
            .unwrap();
        store
            .upsert_project_summary(ProjectSummary::now(project.id, "second"))
            .await
            .unwrap();
        let summary = store.project_summary(project.id).await.unwrap().unwrap();
        assert_eq!(summary.content, "second");

        assert!(store
            .upsert_project_summary(ProjectSummary::now(ProjectId(999), "x"))
            .await
            .is_err());
    }
}

//! Testing utilities for the retro workspace
//!
//! Shared sample documents, deterministic generators, and a seeded service.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::NaiveDate;
use retro_core::{
    AdviceGenerator, GenerationError, MemoryStore, Project, ProjectDraft, RetroService, Sprint,
    SprintDraft, Summarizer, UserId,
};
use retro_template::{ParsedAnswer, TemplateKind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const KPT_DOC: &str = "\
# Sprint 1 회고록

## Keep
daily sync
pairing on hard tickets

## Problem
slow CI
late reviews

## Try
smaller PRs";

pub const CSS_DOC: &str = "\
## Continue
demo every friday
## Stop
merging without review
## Start
writing ADRs";

pub const FOUR_LS_DOC: &str = "\
## Liked
pairing
## Learned
tokio internals
## Lacked
test coverage
## LoggedFor
better estimates";

pub fn sample_doc(kind: TemplateKind) -> &'static str {
    match kind {
        TemplateKind::Kpt => KPT_DOC,
        TemplateKind::Css => CSS_DOC,
        TemplateKind::FourLs => FOUR_LS_DOC,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Generator answering with fixed text and counting calls
#[derive(Debug, Default)]
pub struct StaticGenerator {
    pub sprint_calls: AtomicUsize,
    pub project_calls: AtomicUsize,
    pub advice_calls: AtomicUsize,
}

impl StaticGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sprint_calls(&self) -> usize {
        self.sprint_calls.load(Ordering::SeqCst)
    }

    pub fn project_calls(&self) -> usize {
        self.project_calls.load(Ordering::SeqCst)
    }

    pub fn advice_calls(&self) -> usize {
        self.advice_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for StaticGenerator {
    async fn summarize_sprint(
        &self,
        kind: TemplateKind,
        contents: &ParsedAnswer,
    ) -> Result<String, GenerationError> {
        self.sprint_calls.fetch_add(1, Ordering::SeqCst);
        let filled = contents.iter().filter(|(_, v)| !v.is_empty()).count();
        Ok(format!("{kind} summary ({filled} fields)"))
    }

    async fn summarize_project(&self, summaries: &[String]) -> Result<String, GenerationError> {
        self.project_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("project summary of {} sprints", summaries.len()))
    }
}

#[async_trait]
impl AdviceGenerator for StaticGenerator {
    async fn advise(
        &self,
        kind: TemplateKind,
        section_header: &str,
        text: &str,
    ) -> Result<String, GenerationError> {
        self.advice_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{kind} {section_header}: {text}"))
    }
}

/// Generator that always fails
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingGenerator;

#[async_trait]
impl Summarizer for FailingGenerator {
    async fn summarize_sprint(
        &self,
        _kind: TemplateKind,
        _contents: &ParsedAnswer,
    ) -> Result<String, GenerationError> {
        Err(GenerationError::Other("summarizer offline".to_string()))
    }

    async fn summarize_project(&self, _summaries: &[String]) -> Result<String, GenerationError> {
        Err(GenerationError::Other("summarizer offline".to_string()))
    }
}

#[async_trait]
impl AdviceGenerator for FailingGenerator {
    async fn advise(
        &self,
        _kind: TemplateKind,
        _section_header: &str,
        _text: &str,
    ) -> Result<String, GenerationError> {
        Err(GenerationError::EmptyResponse)
    }
}

pub fn service_with(generator: Arc<StaticGenerator>) -> RetroService {
    RetroService::new(Arc::new(MemoryStore::new()), generator.clone(), generator)
}

pub fn failing_service() -> RetroService {
    RetroService::new(
        Arc::new(MemoryStore::new()),
        Arc::new(FailingGenerator),
        Arc::new(FailingGenerator),
    )
}

/// Owner, project and first sprint of a seeded service
#[derive(Debug, Clone)]
pub struct Seed {
    pub user: UserId,
    pub project: Project,
    pub sprint: Sprint,
}

pub async fn seed(service: &RetroService) -> Seed {
    let user = service
        .register_user("kim@example.com", "kim")
        .await
        .unwrap()
        .id;
    let project = service
        .create_project(user, &ProjectDraft::new("Atlas", "kim"))
        .await
        .unwrap();
    let sprint = service
        .create_sprint(
            user,
            project.id,
            &SprintDraft::new("Sprint 1", date(2024, 3, 4), date(2024, 3, 15)),
        )
        .await
        .unwrap();
    Seed {
        user,
        project,
        sprint,
    }
}

pub async fn seeded_service() -> (RetroService, Arc<StaticGenerator>, Seed) {
    let generator = StaticGenerator::new();
    let service = service_with(generator.clone());
    let seed = seed(&service).await;
    (service, generator, seed)
}

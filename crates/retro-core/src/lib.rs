//! Retrospective service
//!
//! Composes the template layer with persistence and text generation.
//!
//! # Core Operations
//!
//! - **Projects and sprints**: owner-scoped CRUD over the ownership model
//! - **Template selection**: start a retrospective for a sprint
//! - **Answer submission**: parse or rename answers, then summarize
//! - **Listing and detail**: per-project listing and rendered documents
//! - **Advice**: feedback on the template's advice section
//!
//! # Architecture
//!
//! ```text
//! request → RetroService → adapters → retro_template
//!               ↓      ↓
//!        RetroStore   Summarizer / AdviceGenerator
//!        (MemoryStore) (OpenAiClient)
//! ```
//!
//! Collaborators are trait objects, so tests swap in mocks or fixtures.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod adapters;
pub mod api;
pub mod config;
pub mod error;
pub mod generation;
pub mod openai;
pub mod service;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use api::{
    Advice, AdviceRequest, AnswerPayload, ApiResponse, ErrorDetail, ProjectRetrospectives,
    RetroUpdate, RetroUpdated, RetrospectiveDetail, RetrospectiveRow, SelectedTemplate,
    TemplateSelection,
};
pub use config::{ConfigError, GenerationConfig, RetroConfig};
pub use error::{GenerationError, ServiceError, ServiceResult, StoreError};
pub use generation::{AdviceGenerator, ChatPrompt, Summarizer};
pub use openai::OpenAiClient;
pub use service::RetroService;
pub use store::{MemoryStore, RetroStore};
pub use types::{
    Project, ProjectDraft, ProjectId, ProjectSummary, RetroId, Retrospective, Sprint, SprintDraft,
    SprintId, User, UserId,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the retrospective service
    pub use crate::api::{AdviceRequest, AnswerPayload, ApiResponse, RetroUpdate, TemplateSelection};
    pub use crate::error::{ServiceError, ServiceResult};
    pub use crate::generation::{AdviceGenerator, Summarizer};
    pub use crate::service::RetroService;
    pub use crate::store::{MemoryStore, RetroStore};
    pub use crate::types::{ProjectDraft, ProjectId, RetroId, SprintDraft, SprintId, UserId};
    pub use retro_template::{FieldKey, TemplateKind};
}

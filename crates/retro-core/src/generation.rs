//! Text-generation collaborators
//!
//! The service asks a [`Summarizer`] for sprint and project summaries and an
//! [`AdviceGenerator`] for feedback on the advice section. [`ChatPrompt`]
//! builds the chat messages both send.

use crate::error::GenerationError;
use async_trait::async_trait;
use retro_template::{ParsedAnswer, TemplateKind};

/// Produces sprint and project summaries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize the answers of one retrospective
    async fn summarize_sprint(
        &self,
        kind: TemplateKind,
        contents: &ParsedAnswer,
    ) -> Result<String, GenerationError>;

    /// Summarize a project from its sprint summaries
    async fn summarize_project(&self, summaries: &[String]) -> Result<String, GenerationError>;
}

/// Produces advice on one section of a retrospective
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    /// Advice on `text`, written under `section_header` of a `kind` template
    async fn advise(
        &self,
        kind: TemplateKind,
        section_header: &str,
        text: &str,
    ) -> Result<String, GenerationError>;
}

/// System and user message plus sampling settings for one request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    /// System message
    pub system: String,
    /// User message
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Token cap
    pub max_tokens: Option<u32>,
}

const SINGLE_NEWLINES: &str = "반환된 텍스트는 반드시 텍스트로만 구성되고, 줄바꿈은 한 번만 사용해주세요. \
     즉, \\n\\n이 아닌 필요할 때 \\n을 사용하는 것입니다.";

impl ChatPrompt {
    /// Create new prompt
    #[inline]
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// With temperature
    #[inline]
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// With token cap
    #[inline]
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Summary request for one retrospective; empty fields are left out
    #[must_use]
    pub fn sprint_summary(kind: TemplateKind, contents: &ParsedAnswer) -> Self {
        let body = contents
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(field, value)| format!("{field}: {value}"))
            .collect::<Vec<_>>()
            .join("\n");

        let user = format!(
            "다음은 '{}' 템플릿을 기반으로 작성된 스프린트 회고 내용입니다:\n{body}\n\n\
             템플릿 설명: {}\n\n\
             이 회고 내용을 바탕으로 요약을 작성해주세요. \
             요약은 간결하고 중요한 점을 포함해주세요. {SINGLE_NEWLINES}",
            kind.name(),
            template_description(kind),
        );
        Self::new("assistant는 사용자 회고 내용을 요약합니다.", user)
    }

    /// Summary request across a project's sprint summaries
    #[must_use]
    pub fn project_summary(summaries: &[String]) -> Self {
        let user = format!(
            "다음은 특정 프로젝트의 각 스프린트에 작성된 회고 요약 내용입니다:\n{}\n\n\
             이 모든 회고 내용을 바탕으로 프로젝트 전체를 요약해주세요. \
             요약은 3~5문장으로 간결하고 중요한 점만 포함해주세요. {SINGLE_NEWLINES}",
            summaries.join("\n\n"),
        );
        Self::new("assistant는 프로젝트 전체 회고 내용을 요약합니다.", user)
    }

    /// Advice request for one section
    #[must_use]
    pub fn advice(kind: TemplateKind, section_header: &str, text: &str) -> Self {
        let system = format!(
            "네 역할은 회고를 효과적으로 도와주는 도우미야. \
             회고는 과거를 돌아보고 그 경험에서 배운 점을 정리하며, \
             팀이 무엇이 잘 되었고, 무엇이 개선되어야 하는지를 학습하는 과정이야.\n\n\
             {}\n\n\
             다음은 효과적인 회고를 위한 가이드야:\n\
             - 개인화하여 말하지 않기: 사람을 비난하지 않고 실행 사실에 대해 논의하기\n\
             - 창의적 마인드: 문제 해결에 대해 창의적으로 접근하기\n\n\
             사용자는 템플릿의 특정 필드에 대한 회고 내용을 작성하고, 중간에 네 조언을 요청할 거야. \
             너는 사용자가 효과적으로 회고를 진행할 수 있도록 실행 가능하고 건설적인 조언을 제공해야 해.",
            template_guide(kind),
        );
        let user = format!(
            "사용자는 '{}' 템플릿의 '{section_header}' 필드에 대해 다음과 같이 작성했어:\n\
             '{text}'\n\n\
             효과적인 회고를 위해 이 작성 내용을 개선하거나 보완할 수 있는 조언을 최대 5줄로 제공해줘.",
            kind.name(),
        );
        Self::new(system, user)
    }
}

/// One-line description of a template's fields
#[must_use]
pub const fn template_description(kind: TemplateKind) -> &'static str {
    match kind {
        TemplateKind::Kpt => "Keep(유지할 점), Problem(개선할 점), Try(시도할 점)",
        TemplateKind::Css => "Continue(계속할 점), Stop(중단할 점), Start(시작할 점)",
        TemplateKind::FourLs => {
            "Liked(좋았던 점), Learned(배운 점), Lacked(부족했던 점), LoggedFor(앞으로 참고할 점)"
        }
    }
}

/// Guide to a template given to the advice model
#[must_use]
pub const fn template_guide(kind: TemplateKind) -> &'static str {
    match kind {
        TemplateKind::Kpt => {
            "KPT 템플릿은 Keep(성공적으로 진행된 점), Problem(개선이 필요한 점), \
             Try(앞으로 시도할 것)로 구성됩니다. 각각의 필드는 팀의 성장과 발전을 목표로 합니다."
        }
        TemplateKind::Css => {
            "CSS 템플릿은 Continue(계속해야 할 것), Stop(중단해야 할 것), \
             Start(새롭게 시작해야 할 것)로 구성됩니다. 각 필드는 명확한 행동 계획을 도출하는 데 중점을 둡니다."
        }
        TemplateKind::FourLs => {
            "4LS 템플릿은 Liked(긍정적인 점), Learned(배운 점), \
             Lacked(부족했던 점), LoggedFor(앞으로 활용할 점)로 구성됩니다. \
             각 필드는 회고를 통해 교훈을 얻고 팀의 방향성을 설정하는 데 사용됩니다."
        }
    }
}

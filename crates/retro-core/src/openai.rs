//! Chat-completions client
//!
//! Implements [`Summarizer`] and [`AdviceGenerator`] against an
//! OpenAI-compatible `/chat/completions` endpoint. Failures are logged and
//! returned; nothing is retried.

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::generation::{AdviceGenerator, ChatPrompt, Summarizer};
use async_trait::async_trait;
use retro_template::{ParsedAnswer, TemplateKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest error body kept in [`GenerationError::Status`]
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for the chat-completions API
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    config: GenerationConfig,
}

impl OpenAiClient {
    /// Create client
    ///
    /// # Errors
    /// `GenerationError::Http` if the HTTP client cannot be built
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Settings in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Endpoint URL
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn request_body<'a>(&'a self, prompt: &'a ChatPrompt) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: prompt.temperature,
            max_tokens: prompt.max_tokens,
        }
    }

    /// Send one prompt and return the first choice's text
    ///
    /// # Errors
    /// `MissingApiKey` without a key, `Http` for transport and decoding
    /// failures, `Status` for non-success responses, `EmptyResponse` when no
    /// text came back
    pub async fn complete(&self, prompt: &ChatPrompt) -> Result<String, GenerationError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            let cut = message.char_indices().nth(MAX_ERROR_BODY).map(|(i, _)| i);
            if let Some(cut) = cut {
                message.truncate(cut);
            }
            tracing::warn!(status = status.as_u16(), %message, "chat completion rejected");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }

    async fn complete_logged(
        &self,
        operation: &'static str,
        prompt: &ChatPrompt,
    ) -> Result<String, GenerationError> {
        tracing::debug!(operation, model = %self.config.model, "requesting chat completion");
        self.complete(prompt).await.map_err(|err| {
            tracing::error!(operation, error = %err, "chat completion failed");
            err
        })
    }
}

#[async_trait]
impl Summarizer for OpenAiClient {
    async fn summarize_sprint(
        &self,
        kind: TemplateKind,
        contents: &ParsedAnswer,
    ) -> Result<String, GenerationError> {
        if contents.is_blank() {
            return Err(GenerationError::EmptyInput("retrospective answers"));
        }
        let prompt = ChatPrompt::sprint_summary(kind, contents)
            .with_temperature(self.config.summary_temperature);
        self.complete_logged("summarize_sprint", &prompt).await
    }

    async fn summarize_project(&self, summaries: &[String]) -> Result<String, GenerationError> {
        if summaries.iter().all(|s| s.trim().is_empty()) {
            return Err(GenerationError::EmptyInput("sprint summaries"));
        }
        let prompt =
            ChatPrompt::project_summary(summaries).with_temperature(self.config.summary_temperature);
        self.complete_logged("summarize_project", &prompt).await
    }
}

#[async_trait]
impl AdviceGenerator for OpenAiClient {
    async fn advise(
        &self,
        kind: TemplateKind,
        section_header: &str,
        text: &str,
    ) -> Result<String, GenerationError> {
        let prompt = ChatPrompt::advice(kind, section_header, text)
            .with_temperature(self.config.advice_temperature)
            .with_max_tokens(self.config.advice_max_tokens);
        self.complete_logged("advise", &prompt).await
    }
}

//! Text generation backends

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use crate::config::OpenAiConfig;
use crate::error::{AiError, AiResult};

/// One system + user prompt exchange
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
}

/// Produces free text from a prompt
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> AiResult<String>;
}

/// Pick the OpenAI backend when a key is configured, the offline one otherwise.
pub fn text_generator(config: &OpenAiConfig) -> Arc<dyn TextGenerator> {
    match OpenAiTextGenerator::new(config.clone()) {
        Some(generator) => Arc::new(generator),
        None => {
            tracing::warn!("OPENAI_API_KEY not set, using offline text generator");
            Arc::new(OfflineTextGenerator)
        }
    }
}

/// Chat-completions client for OpenAI-compatible APIs
pub struct OpenAiTextGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiTextGenerator {
    /// `None` when the config carries no API key
    pub fn new(config: OpenAiConfig) -> Option<Self> {
        let api_key = config.api_key?;
        Some(Self {
            client: Client::new(),
            api_key,
            base_url: config.base_url,
            model: config.model,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    #[instrument(skip(self, request), fields(model = %self.model, max_tokens = request.max_tokens))]
    async fn generate(&self, request: GenerationRequest) -> AiResult<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiError::Generation(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AiError::Generation("No completion returned".to_string()))
    }
}

/// Deterministic stand-in used when no API key is configured
pub struct OfflineTextGenerator;

#[async_trait]
impl TextGenerator for OfflineTextGenerator {
    async fn generate(&self, request: GenerationRequest) -> AiResult<String> {
        let brief: Vec<&str> = request
            .prompt
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        Ok(format!(
            "AI text generation is not configured; drafting from the brief.\n\n{}",
            brief.join("\n")
        ))
    }
}

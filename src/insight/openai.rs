//! OpenAI chat-completions client.

use crate::config::LlmSettings;
use crate::error::InsightError;
use crate::insight::LanguageModel;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Message in a chat request.
#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

/// Chat-completions response body.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiClient {
    settings: LlmSettings,
    http_client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(settings: LlmSettings) -> Result<Self, InsightError> {
        info!("Using language model {}", settings.model);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(InsightError::Request)?;

        Ok(Self {
            settings,
            http_client,
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.api_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    fn model_name(&self) -> &str {
        &self.settings.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, InsightError> {
        let url = self.completions_url();

        let request = ChatCompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        debug!("Sending completion request to {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InsightError::Timeout {
                        seconds: self.settings.timeout_seconds,
                        source: e,
                    }
                } else if e.is_connect() {
                    InsightError::Connect {
                        url: url.clone(),
                        source: e,
                    }
                } else {
                    InsightError::Request(e)
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(InsightError::Unauthorized { status });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Status { status, body });
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(InsightError::Decode)?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(InsightError::NoChoices)?;

        choice.message.content.ok_or(InsightError::MissingContent)
    }
}

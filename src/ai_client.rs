//! # AI Client
//!
//! Client for an OpenAI-compatible chat-completions API. It handles three kinds
//! of request:
//!
//! - food recognition from a text description
//! - food recognition from a meal photo, sent as a base64 data URL
//! - free-form coach chat
//!
//! Recognition requests return the raw reply text; turning it into nutrition is
//! the job of [`crate::response_reconciler`]. Transport failures, rate limits
//! and server errors are retried with exponential backoff and random jitter.

use crate::ai_errors::AiError;
use crate::config::{AiConfig, RecoveryConfig};
use crate::image_input::MealImage;
use crate::prompt::PromptBuilder;
use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Longest error body kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(text.to_string()),
        }
    }

    pub fn user(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.to_string()),
        }
    }

    pub fn assistant(text: &str) -> Self {
        Self {
            role: "assistant".to_string(),
            content: MessageContent::Text(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
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

/// Pull the first choice's text out of a chat-completion body
pub fn parse_completion(body: &str) -> Result<String, AiError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| AiError::InvalidResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| AiError::InvalidResponse("missing message content".into()))
}

/// Delay before retry number `attempt` (0-based)
///
/// Doubles from `base_retry_delay_ms`, capped at `max_retry_delay_ms`, plus up
/// to half the base delay of random jitter.
pub fn retry_delay<R: Rng + ?Sized>(
    attempt: u32,
    recovery: &RecoveryConfig,
    rng: &mut R,
) -> Duration {
    let exponential = recovery
        .base_retry_delay_ms
        .saturating_mul(1u64 << attempt.min(16))
        .min(recovery.max_retry_delay_ms);
    let jitter = rng.gen_range(0..=recovery.base_retry_delay_ms / 2);
    Duration::from_millis(exponential + jitter)
}

fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

pub struct AiClient {
    http: Client,
    config: AiConfig,
}

impl AiClient {
    /// Create a client; the request timeout comes from `config.timeout_secs`
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Ask for nutrition of a text description
    pub async fn recognize_text(&self, description: &str) -> Result<String, AiError> {
        let prompt = PromptBuilder::for_description(description).build();
        let messages = [ChatMessage::user(&prompt)];
        self.complete(&self.config.model, &messages, true).await
    }

    /// Ask for nutrition of a meal photo
    pub async fn recognize_image(&self, image: &MealImage) -> Result<String, AiError> {
        let prompt = PromptBuilder::for_image().build();
        let messages = [ChatMessage {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: prompt },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.to_data_url(),
                    },
                },
            ]),
        }];
        self.complete(&self.config.vision_model, &messages, true).await
    }

    /// Continue a coach conversation
    ///
    /// `history` holds earlier user and assistant turns, oldest first.
    pub async fn coach_chat(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, AiError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(message));
        self.complete(&self.config.model, &messages, false).await
    }

    /// Send a completion request, retrying transient failures
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        json_mode: bool,
    ) -> Result<String, AiError> {
        let api_key = self.config.api_key.as_deref().ok_or(AiError::MissingApiKey)?;
        let recovery = &self.config.recovery;

        let mut attempt = 0;
        loop {
            match self.send_once(api_key, model, messages, json_mode).await {
                Ok(text) => {
                    info!(model, attempt, chars = text.len(), "AI completion received");
                    return Ok(text);
                }
                Err(e) if e.is_retryable() && attempt < recovery.max_retries => {
                    let delay = retry_delay(attempt, recovery, &mut rand::thread_rng());
                    warn!(
                        model,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "AI request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(model, attempt, error = %e, "AI request failed");
                    return Err(e);
                }
            }
        }
    }

    async fn send_once(
        &self,
        api_key: &str,
        model: &str,
        messages: &[ChatMessage],
        json_mode: bool,
    ) -> Result<String, AiError> {
        let body = ChatRequest {
            model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: if json_mode { 0.2 } else { 0.7 },
            response_format: json_mode.then(|| json!({"type": "json_object"})),
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(%url, model, messages = messages.len(), "Sending AI request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return parse_completion(&text);
        }

        let message = format!("HTTP {status}: {}", truncate_body(&text));
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Err(AiError::Http(message))
        } else {
            Err(AiError::Rejected(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_completion() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  {\"name\":\"dal\"} "}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "{\"name\":\"dal\"}");

        let empty = r#"{"choices":[]}"#;
        assert!(matches!(parse_completion(empty), Err(AiError::InvalidResponse(_))));

        let null_content = r#"{"choices":[{"message":{"content":null}}]}"#;
        assert!(parse_completion(null_content).is_err());

        assert!(parse_completion("<html>bad gateway</html>").is_err());
    }

    #[test]
    fn test_retry_delay_backoff() {
        let recovery = RecoveryConfig {
            base_retry_delay_ms: 100,
            max_retry_delay_ms: 350,
            ..RecoveryConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(7);

        let first = retry_delay(0, &recovery, &mut rng).as_millis();
        let second = retry_delay(1, &recovery, &mut rng).as_millis();
        let capped = retry_delay(10, &recovery, &mut rng).as_millis();

        assert!((100..=150).contains(&first));
        assert!((200..=250).contains(&second));
        assert!((350..=400).contains(&capped));
    }

    #[test]
    fn test_image_message_shape() {
        let message = ChatMessage {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text {
                    text: "what is this".to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: "data:image/png;base64,AAAA".to_string(),
                    },
                },
            ]),
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][1]["type"], "image_url");
        assert_eq!(value["content"][1]["image_url"]["url"], "data:image/png;base64,AAAA");

        let text = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(text, json!({"role": "user", "content": "hi"}));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = AiClient::new(AiConfig::default()).unwrap();
        let result = client.recognize_text("2 rotis").await;
        assert_eq!(result, Err(AiError::MissingApiKey));
    }
}

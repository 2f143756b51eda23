//! # Recognition Service
//!
//! Entry point used by the meal-logging caller. Calls the AI provider when an
//! API key is configured and the circuit breaker is closed, then always hands
//! the outcome to the reconciler. Provider errors are logged and end in local
//! recognition, so text recognition always returns a result.

use crate::ai_client::{AiClient, ChatMessage};
use crate::ai_errors::AiError;
use crate::calorie_target::CalorieTarget;
use crate::circuit_breaker::CircuitBreaker;
use crate::config::AiConfig;
use crate::daily_summary::DailySummary;
use crate::food_model::RecognitionResult;
use crate::image_input::load_meal_image;
use crate::mock_recognition::mock_image_recognition;
use crate::prompt::coach_system_prompt;
use crate::response_reconciler::reconcile;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tracing::{info, warn};

/// Description reconciled against replies for meal photos
pub const IMAGE_DESCRIPTION: &str = "meal photo";

pub struct RecognitionService {
    config: AiConfig,
    client: Option<AiClient>,
    breaker: CircuitBreaker,
}

impl RecognitionService {
    pub fn new(config: AiConfig) -> Self {
        let client = if config.has_api_key() {
            match AiClient::new(config.clone()) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!(error = %e, "Could not build AI client, using local recognition");
                    None
                }
            }
        } else {
            info!("No OPENAI_API_KEY configured, using local recognition");
            None
        };

        Self {
            breaker: CircuitBreaker::new(config.recovery.clone()),
            config,
            client,
        }
    }

    pub fn from_env() -> Self {
        Self::new(AiConfig::from_env())
    }

    /// Whether requests can currently reach the AI provider
    pub fn is_ai_available(&self) -> bool {
        self.client.is_some() && !self.breaker.is_open()
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    fn available_client(&self) -> Result<&AiClient, AiError> {
        let client = self.client.as_ref().ok_or(AiError::MissingApiKey)?;
        if self.breaker.is_open() {
            return Err(AiError::CircuitOpen);
        }
        Ok(client)
    }

    fn record_outcome<T>(&self, outcome: &Result<T, AiError>) {
        match outcome {
            Ok(_) => self.breaker.record_success(),
            Err(AiError::MissingApiKey | AiError::CircuitOpen | AiError::ImageValidation(_)) => {}
            Err(_) => self.breaker.record_failure(),
        }
    }

    fn into_reply(outcome: Result<String, AiError>) -> Option<String> {
        match outcome {
            Ok(text) => Some(text),
            Err(AiError::MissingApiKey) => None,
            Err(e) => {
                warn!(error = %e, "AI recognition unavailable, falling back");
                None
            }
        }
    }

    /// Recognize a food description
    pub async fn recognize_text(&self, description: &str) -> RecognitionResult {
        let outcome = match self.available_client() {
            Ok(client) => {
                let outcome = client.recognize_text(description).await;
                self.record_outcome(&outcome);
                outcome
            }
            Err(e) => Err(e),
        };

        reconcile(description, Self::into_reply(outcome).as_deref())
    }

    /// Recognize a meal photo
    ///
    /// # Errors
    ///
    /// Returns an error when the file is missing, too large or not a
    /// supported image.
    pub async fn recognize_image(&self, path: &Path) -> Result<RecognitionResult> {
        self.recognize_image_with(path, &mut StdRng::from_entropy()).await
    }

    /// Recognize a meal photo, drawing the offline mock from `rng`
    pub async fn recognize_image_with<R: Rng + ?Sized>(
        &self,
        path: &Path,
        rng: &mut R,
    ) -> Result<RecognitionResult> {
        let image = load_meal_image(path, self.config.max_image_size)
            .with_context(|| format!("Invalid meal photo: {}", path.display()))?;

        let outcome = match self.available_client() {
            Ok(client) => {
                let outcome = client.recognize_image(&image).await;
                self.record_outcome(&outcome);
                outcome
            }
            Err(e) => Err(e),
        };

        Ok(match Self::into_reply(outcome) {
            Some(reply) => reconcile(IMAGE_DESCRIPTION, Some(&reply)),
            None => mock_image_recognition(rng),
        })
    }

    /// Reply to a coach chat message
    ///
    /// Without the AI provider a short local reply based on today's totals is
    /// returned.
    pub async fn coach_reply(
        &self,
        target: Option<&CalorieTarget>,
        today: Option<&DailySummary>,
        history: &[ChatMessage],
        message: &str,
    ) -> String {
        let outcome = match self.available_client() {
            Ok(client) => {
                let system_prompt = coach_system_prompt(target, today);
                let outcome = client.coach_chat(&system_prompt, history, message).await;
                self.record_outcome(&outcome);
                outcome
            }
            Err(e) => Err(e),
        };

        Self::into_reply(outcome).unwrap_or_else(|| local_coach_reply(today))
    }
}

const NO_TARGET_REPLY: &str =
    "Set your body profile and log your meals, and I can track your progress against a daily target.";

/// Coach reply used without the AI provider
pub fn local_coach_reply(today: Option<&DailySummary>) -> String {
    match today.and_then(|today| today.remaining_calories) {
        Some(remaining) if remaining > 0 => format!(
            "You have {remaining} kcal left today. A protein-rich meal with vegetables is a good way to use them."
        ),
        Some(0) => "You have hit your calorie target for today exactly. Nice work!".to_string(),
        Some(remaining) => format!(
            "You are {} kcal over your target today. Keep the next meal light and go for a walk if you can.",
            -remaining
        ),
        None => NO_TARGET_REPLY.to_string(),
    }
}

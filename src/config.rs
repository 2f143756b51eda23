//! # AI Configuration Module
//!
//! Settings for the AI provider: credentials, endpoint, models, request limits
//! and the retry and circuit breaker behavior. Values come from the
//! environment; `.env` files are loaded by the binary before this runs.

use std::env;
use tracing::warn;

// Constants for AI configuration
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_TOKENS: u32 = 800;
pub const MAX_IMAGE_SIZE: u64 = 10 * 1024 * 1024; // 10MB limit for meal photos

/// Recovery configuration for error handling
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Circuit breaker failure threshold
    pub circuit_breaker_threshold: u32,
    /// Circuit breaker reset timeout in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_retry_delay_ms: 500,  // 0.5 seconds
            max_retry_delay_ms: 5000,  // 5 seconds
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

/// Configuration for the AI provider
#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    /// API key; recognition runs locally when absent
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Model for text recognition and coach chat
    pub model: String,
    /// Model for meal photos
    pub vision_model: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Completion token limit
    pub max_tokens: u32,
    /// Maximum accepted photo size in bytes
    pub max_image_size: u64,
    /// Recovery and error handling configuration
    pub recovery: RecoveryConfig,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_image_size: MAX_IMAGE_SIZE,
            recovery: RecoveryConfig::default(),
        }
    }
}

impl AiConfig {
    /// Read the configuration from environment variables
    ///
    /// `OPENAI_API_KEY`, `AI_BASE_URL`, `AI_MODEL`, `AI_VISION_MODEL` and
    /// `AI_TIMEOUT_SECS`; anything unset keeps its default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup, used by [`AiConfig::from_env`]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout_secs = match non_empty("AI_TIMEOUT_SECS") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Invalid AI_TIMEOUT_SECS, using default");
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            api_key: non_empty("OPENAI_API_KEY"),
            base_url: non_empty("AI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: non_empty("AI_MODEL").unwrap_or(defaults.model),
            vision_model: non_empty("AI_VISION_MODEL").unwrap_or(defaults.vision_model),
            timeout_secs,
            ..defaults
        }
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

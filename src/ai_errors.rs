//! # AI Error Types Module
//!
//! Errors raised at the AI provider boundary. None of them reach the caller of
//! the recognition service: they are logged and demote the request to local
//! recognition.

/// Custom error types for AI provider operations
#[derive(Debug, Clone, PartialEq)]
pub enum AiError {
    /// No API key configured
    MissingApiKey,
    /// Transport errors, rate limiting and server-side HTTP errors
    Http(String),
    /// Request refused by the provider (4xx other than 429)
    Rejected(String),
    /// Response body did not have the expected shape
    InvalidResponse(String),
    /// Circuit breaker is open after repeated failures
    CircuitOpen,
    /// Request exceeded the configured timeout
    Timeout(String),
    /// Meal photo failed validation
    ImageValidation(String),
}

impl AiError {
    /// Whether retrying the same request can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, AiError::Http(_) | AiError::Timeout(_))
    }
}

impl std::fmt::Display for AiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiError::MissingApiKey => write!(f, "Missing API key: set OPENAI_API_KEY"),
            AiError::Http(msg) => write!(f, "HTTP error: {msg}"),
            AiError::Rejected(msg) => write!(f, "Request rejected: {msg}"),
            AiError::InvalidResponse(msg) => write!(f, "Invalid response: {msg}"),
            AiError::CircuitOpen => write!(f, "Circuit breaker is open"),
            AiError::Timeout(msg) => write!(f, "Timeout error: {msg}"),
            AiError::ImageValidation(msg) => write!(f, "Image validation error: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AiError::Timeout(err.to_string())
        } else if err.is_decode() {
            AiError::InvalidResponse(err.to_string())
        } else {
            AiError::Http(err.to_string())
        }
    }
}

impl From<std::io::Error> for AiError {
    fn from(err: std::io::Error) -> Self {
        AiError::ImageValidation(err.to_string())
    }
}

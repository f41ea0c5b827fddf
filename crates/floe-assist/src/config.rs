// ABOUTME: Provider configuration loaded from environment variables at process start.
// ABOUTME: The provider list is immutable for the process lifetime; absence of all keys disables AI.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("FLOE_AI_TIMEOUT_SECS is not a positive integer: {0}")]
    InvalidTimeout(String),

    #[error("FLOE_AI_MAX_RETRIES is not a non-negative integer: {0}")]
    InvalidRetries(String),
}

/// One configured text-generation provider. Position in
/// `AssistConfig::providers` is its priority rank.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub name: String,
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub extra_headers: Vec<(String, String)>,
    pub timeout: Duration,
    pub max_retries: u32,
}

/// Assistance-layer configuration. Built once from the environment;
/// never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct AssistConfig {
    pub providers: Vec<ProviderConfig>,
}

const GROQ_DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
const GROQ_DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
const OPENROUTER_DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
const OPENROUTER_DEFAULT_MODEL: &str = "google/gemma-3-4b-it:free";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 1;

impl AssistConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - FLOE_GROQ_API_KEY: enables the Groq provider (priority 1)
    /// - FLOE_GROQ_ENDPOINT / FLOE_GROQ_MODEL: optional overrides
    /// - FLOE_OPENROUTER_API_KEY: enables the OpenRouter provider (priority 2)
    /// - FLOE_OPENROUTER_ENDPOINT / FLOE_OPENROUTER_MODEL: optional overrides
    /// - FLOE_AI_TIMEOUT_SECS: per-attempt timeout (default: 30)
    /// - FLOE_AI_MAX_RETRIES: extra attempts per provider (default: 1)
    ///
    /// With neither key set the provider list is empty and the gateway
    /// starts Disabled. That state is decided here, once, not rediscovered
    /// on every call.
    pub fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = match std::env::var("FLOE_AI_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        let timeout = Duration::from_secs(timeout_secs);

        let max_retries = match std::env::var("FLOE_AI_MAX_RETRIES") {
            Ok(raw) => raw
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidRetries(raw))?,
            Err(_) => DEFAULT_MAX_RETRIES,
        };

        let mut providers = Vec::new();

        if let Some(api_key) = non_empty_env("FLOE_GROQ_API_KEY") {
            providers.push(ProviderConfig {
                name: "groq".to_string(),
                endpoint: std::env::var("FLOE_GROQ_ENDPOINT")
                    .unwrap_or_else(|_| GROQ_DEFAULT_ENDPOINT.to_string()),
                api_key,
                model: std::env::var("FLOE_GROQ_MODEL")
                    .unwrap_or_else(|_| GROQ_DEFAULT_MODEL.to_string()),
                extra_headers: Vec::new(),
                timeout,
                max_retries,
            });
        }

        if let Some(api_key) = non_empty_env("FLOE_OPENROUTER_API_KEY") {
            providers.push(ProviderConfig {
                name: "openrouter".to_string(),
                endpoint: std::env::var("FLOE_OPENROUTER_ENDPOINT")
                    .unwrap_or_else(|_| OPENROUTER_DEFAULT_ENDPOINT.to_string()),
                api_key,
                model: std::env::var("FLOE_OPENROUTER_MODEL")
                    .unwrap_or_else(|_| OPENROUTER_DEFAULT_MODEL.to_string()),
                extra_headers: vec![
                    ("HTTP-Referer".to_string(), "https://floe-portal.org".to_string()),
                    ("X-Title".to_string(), "Floe AI Assist".to_string()),
                ],
                timeout,
                max_retries,
            });
        }

        Ok(Self { providers })
    }

    /// True when no provider credential is configured.
    pub fn is_disabled(&self) -> bool {
        self.providers.is_empty()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

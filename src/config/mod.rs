//! Configuration for the relay
//!
//! Everything is resolved exactly once at process start, from environment
//! variables (a `.env` file is honored by the binary). The resulting
//! [`RelayConfig`] is immutable for the process lifetime; a missing variable
//! disables the corresponding provider instead of erroring.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

/// Default listen port, matching the original deployment
pub const DEFAULT_PORT: u16 = 5000;

/// The closed set of backend families the relay can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local inference server (generate-style endpoint)
    Ollama,
    /// Hosted inference gateway A (chat-completions shape)
    OpenRouter,
    /// Hosted inference gateway B (chat-completions shape)
    Groq,
    /// Lowest-priority fallback gateway (legacy completions shape)
    OpenAI,
}

impl ProviderKind {
    /// Every known provider, in the default priority order
    pub const ALL: [Self; 4] = [Self::Ollama, Self::OpenRouter, Self::Groq, Self::OpenAI];

    /// Stable name used in responses, logs, and `RELAY_PRIORITY`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenRouter => "openrouter",
            Self::Groq => "groq",
            Self::OpenAI => "openai",
        }
    }

    /// Default endpoint for this provider
    #[must_use]
    pub const fn default_endpoint(self) -> &'static str {
        match self {
            Self::Ollama => "http://localhost:11434",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
            Self::OpenAI => "https://api.openai.com/v1",
        }
    }

    /// Default model for this provider
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Ollama => "llama3",
            Self::OpenRouter => "meta-llama/llama-3-8b-instruct",
            Self::Groq => "llama3-8b-8192",
            Self::OpenAI => "gpt-3.5-turbo-instruct",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openrouter" => Ok(Self::OpenRouter),
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAI),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// Per-provider connection settings, read-only after startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Base URL of the backend; `None` falls back to the provider default
    /// (and, for ollama, disables the adapter)
    pub endpoint: Option<String>,
    /// API key; `None` disables hosted providers
    pub api_key: Option<String>,
    /// Model used when the request does not name one
    pub default_model: String,
}

impl AdapterConfig {
    fn from_env(kind: ProviderKind) -> Self {
        let prefix = kind.as_str().to_uppercase();
        Self {
            endpoint: std::env::var(format!("{prefix}_URL")).ok(),
            api_key: std::env::var(format!("{prefix}_API_KEY")).ok(),
            default_model: std::env::var(format!("{prefix}_MODEL"))
                .unwrap_or_else(|_| kind.default_model().to_string()),
        }
    }

    /// Effective base URL (configured or provider default)
    #[must_use]
    pub fn effective_endpoint(&self, kind: ProviderKind) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| kind.default_endpoint().to_string())
    }
}

/// Whole-process configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    /// Provider priority; first enabled entry wins every request
    pub priority: Vec<ProviderKind>,
    pub ollama: AdapterConfig,
    pub openrouter: AdapterConfig,
    pub groq: AdapterConfig,
    pub openai: AdapterConfig,
    /// Enables the openai fallback adapter even without an API key
    pub openai_fallback: bool,
}

impl RelayConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] on a malformed `PORT` or an unknown
    /// name in `RELAY_PRIORITY`.
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| RelayError::Config(format!("invalid PORT value: {raw}")))?,
            Err(_) => DEFAULT_PORT,
        };

        let priority = match std::env::var("RELAY_PRIORITY") {
            Ok(raw) => parse_priority(&raw)?,
            Err(_) => ProviderKind::ALL.to_vec(),
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            priority,
            ollama: AdapterConfig::from_env(ProviderKind::Ollama),
            openrouter: AdapterConfig::from_env(ProviderKind::OpenRouter),
            groq: AdapterConfig::from_env(ProviderKind::Groq),
            openai: AdapterConfig::from_env(ProviderKind::OpenAI),
            openai_fallback: std::env::var("USE_OPENAI")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }

    /// Settings for one provider
    #[must_use]
    pub fn adapter(&self, kind: ProviderKind) -> &AdapterConfig {
        match kind {
            ProviderKind::Ollama => &self.ollama,
            ProviderKind::OpenRouter => &self.openrouter,
            ProviderKind::Groq => &self.groq,
            ProviderKind::OpenAI => &self.openai,
        }
    }

    /// Whether a provider has the configuration it needs to be called.
    ///
    /// Ollama needs an endpoint; hosted gateways need an API key. The openai
    /// fallback may instead be force-enabled by flag, in which case a dummy
    /// bearer token is sent (OpenAI-compatible local endpoints ignore it).
    #[must_use]
    pub fn is_enabled(&self, kind: ProviderKind) -> bool {
        let cfg = self.adapter(kind);
        match kind {
            ProviderKind::Ollama => cfg.endpoint.is_some(),
            ProviderKind::OpenRouter | ProviderKind::Groq => cfg.api_key.is_some(),
            ProviderKind::OpenAI => cfg.api_key.is_some() || self.openai_fallback,
        }
    }

    /// Enabled providers in priority order
    #[must_use]
    pub fn enabled_providers(&self) -> Vec<ProviderKind> {
        self.priority
            .iter()
            .copied()
            .filter(|&kind| self.is_enabled(kind))
            .collect()
    }
}

/// Parse a comma-separated provider list, e.g. `"groq,ollama"`.
///
/// Duplicates are rejected; providers left out of the list are simply never
/// selected.
fn parse_priority(raw: &str) -> Result<Vec<ProviderKind>> {
    let mut seen = BTreeSet::new();
    let mut order = Vec::new();
    for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
        let kind: ProviderKind = part
            .parse()
            .map_err(|e: String| RelayError::Config(format!("RELAY_PRIORITY: {e}")))?;
        if !seen.insert(kind) {
            return Err(RelayError::Config(format!(
                "RELAY_PRIORITY: duplicate provider: {kind}"
            )));
        }
        order.push(kind);
    }
    if order.is_empty() {
        return Err(RelayError::Config("RELAY_PRIORITY is empty".into()));
    }
    Ok(order)
}

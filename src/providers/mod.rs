//! Provider adapters for the supported LLM backends
//!
//! This module provides adapters translating the normalized request into
//! each backend family's wire format:
//! - Ollama (local inference, generate-style endpoint)
//! - OpenRouter and Groq (hosted chat-completions gateways)
//! - OpenAI-compatible legacy completions (lowest-priority fallback)
//! - Mock responder (no backend configured at all)

pub mod chat;
pub mod mock;
pub mod ollama;
pub mod openai;

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    config::{ProviderKind, RelayConfig},
    error::{AdapterError, Result},
    messages::NormalizedRequest,
};

/// Upper bound on any single outbound call; the original relied on the
/// platform default and could hang indefinitely.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// System preamble prepended to every chat-completions payload
pub const SYSTEM_PREAMBLE: &str = "You are a project assistant. Draft clear, \
well-structured Markdown project documents from the conversation that follows.";

/// Core trait for provider adapters
///
/// An adapter owns wire translation and backend-specific error
/// classification, nothing else: the request it receives is already
/// validated, and it makes exactly one outbound call per invocation.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Stable provider name used in responses and logs
    fn name(&self) -> &'static str;

    /// Translate, call the backend once, and extract the reply text.
    ///
    /// A non-success upstream status or a transport failure is a hard
    /// [`AdapterError`]; an unexpected JSON shape in a successful reply
    /// degrades to the raw body text instead of failing.
    async fn invoke(
        &self,
        request: &NormalizedRequest,
    ) -> std::result::Result<String, AdapterError>;
}

/// The configured adapters, in fixed priority order.
///
/// Built once at startup and read-only afterwards; the first entry wins
/// every request. The status table covers all known providers (including
/// disabled ones) for the health endpoint.
pub struct ProviderRegistry {
    adapters: Vec<Box<dyn ProviderAdapter>>,
    statuses: Vec<(ProviderKind, bool)>,
}

impl ProviderRegistry {
    /// Assemble the registry from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an enabled adapter cannot be constructed
    /// (e.g. an API key that is not a valid header value).
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let mut adapters: Vec<Box<dyn ProviderAdapter>> = Vec::new();
        for kind in config.enabled_providers() {
            adapters.push(build_adapter(kind, config)?);
        }
        let statuses = ProviderKind::ALL
            .iter()
            .map(|&kind| (kind, config.is_enabled(kind)))
            .collect();
        Ok(Self { adapters, statuses })
    }

    /// Build a registry from pre-constructed adapters
    #[must_use]
    pub fn new(
        adapters: Vec<Box<dyn ProviderAdapter>>,
        statuses: Vec<(ProviderKind, bool)>,
    ) -> Self {
        Self { adapters, statuses }
    }

    /// The highest-priority enabled adapter, if any
    #[must_use]
    pub fn first(&self) -> Option<&dyn ProviderAdapter> {
        self.adapters.first().map(|adapter| adapter.as_ref())
    }

    /// Enablement per known provider, in declaration order
    #[must_use]
    pub fn statuses(&self) -> &[(ProviderKind, bool)] {
        &self.statuses
    }

    /// True when no real backend is configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Create the adapter for one provider kind
fn build_adapter(kind: ProviderKind, config: &RelayConfig) -> Result<Box<dyn ProviderAdapter>> {
    let adapter_config = config.adapter(kind).clone();
    match kind {
        ProviderKind::Ollama => Ok(Box::new(ollama::OllamaAdapter::new(adapter_config)?)),
        ProviderKind::OpenRouter | ProviderKind::Groq => Ok(Box::new(
            chat::ChatCompletionsAdapter::new(kind, adapter_config)?,
        )),
        ProviderKind::OpenAI => Ok(Box::new(openai::CompletionsAdapter::new(
            adapter_config,
            config.openai_fallback,
        )?)),
    }
}

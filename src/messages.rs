//! Message types for relayed conversations
//!
//! Every inbound request is normalized into [`NormalizedRequest`] before any
//! provider sees it: either a `messages` array or a legacy single `prompt`
//! string is accepted, never both. Providers answer with plain text which the
//! router wraps into a [`NormalizedResponse`].

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

/// Substituted when a backend replies successfully but with blank content,
/// so `NormalizedResponse::text` is never empty.
pub const EMPTY_CONTENT_SENTINEL: &str = "(upstream returned no content)";

/// Message role in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name shared by every chat-completion style backend
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a new user message
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    /// Create a new system message
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }
}

/// The relay's canonical request shape, independent of which backend serves it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl NormalizedRequest {
    /// Normalize the two accepted input shapes.
    ///
    /// Exactly one of `messages` (non-empty) or `prompt` must be supplied;
    /// the legacy `prompt` becomes a single user message.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Validation`] when both or neither shape is
    /// present, when `messages` is empty, or when `temperature` falls
    /// outside `[0.0, 2.0]`.
    pub fn from_parts(
        messages: Option<Vec<ChatMessage>>,
        prompt: Option<String>,
        model: Option<String>,
        temperature: Option<f32>,
    ) -> Result<Self> {
        let messages = match (messages, prompt) {
            (Some(_), Some(_)) => {
                return Err(RelayError::Validation(
                    "supply either 'messages' or 'prompt', not both".into(),
                ))
            }
            (None, None) => {
                return Err(RelayError::Validation(
                    "no 'messages' array or 'prompt' string provided".into(),
                ))
            }
            (Some(messages), None) => {
                if messages.is_empty() {
                    return Err(RelayError::Validation("'messages' must not be empty".into()));
                }
                messages
            }
            (None, Some(prompt)) => vec![ChatMessage::user(prompt)],
        };

        if let Some(t) = temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(RelayError::Validation(format!(
                    "temperature {t} outside [0.0, 2.0]"
                )));
            }
        }

        Ok(Self {
            messages,
            model,
            temperature,
        })
    }

    /// Collapse the conversation into one prompt string for backends that
    /// take a bare prompt. Role labels are discarded.
    #[must_use]
    pub fn flattened_prompt(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The relay's canonical response shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub text: String,
    /// Which adapter produced the text (e.g. "ollama", "mock")
    pub provider: String,
}

impl NormalizedResponse {
    /// Build a response, substituting the sentinel for blank text
    #[must_use]
    pub fn new(text: String, provider: impl Into<String>) -> Self {
        let text = if text.trim().is_empty() {
            EMPTY_CONTENT_SENTINEL.to_string()
        } else {
            text
        };
        Self {
            text,
            provider: provider.into(),
        }
    }
}

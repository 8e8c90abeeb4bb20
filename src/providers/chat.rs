//! Chat-completions adapter
//!
//! Serves both hosted gateways (OpenRouter and Groq): they share the
//! chat-completions wire shape and bearer authentication, differing only in
//! endpoint, key, and default model. Messages pass through unchanged behind
//! a fixed system preamble; the reply text lives at
//! `choices[0].message.content`.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::{AdapterConfig, ProviderKind},
    error::{AdapterError, RelayError, Result},
    messages::NormalizedRequest,
};

use super::{ProviderAdapter, REQUEST_TIMEOUT, SYSTEM_PREAMBLE};

/// Adapter for chat-completions style gateways
pub struct ChatCompletionsAdapter {
    client: Client,
    config: AdapterConfig,
    kind: ProviderKind,
    base_url: String,
}

impl ChatCompletionsAdapter {
    /// Create an adapter for one chat-completions gateway
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be constructed.
    pub fn new(kind: ProviderKind, config: AdapterConfig) -> Result<Self> {
        let api_key = config.api_key.clone().unwrap_or_default();
        let base_url = config.effective_endpoint(kind);

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::AUTHORIZATION,
                    header::HeaderValue::from_str(&format!("Bearer {api_key}"))
                        .map_err(|_| RelayError::Config("invalid API key format".to_string()))?,
                );
                headers
            })
            .build()
            .map_err(|e| RelayError::Config(format!("{kind} http client: {e}")))?;

        Ok(Self {
            client,
            config,
            kind,
            base_url,
        })
    }

    /// Extract `choices[0].message.content`, degrading to the raw body on a
    /// shape mismatch.
    fn extract_text(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .pointer("/choices/0/message/content")
                    .and_then(Value::as_str)
                    .map(String::from)
            })
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl ProviderAdapter for ChatCompletionsAdapter {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    async fn invoke(
        &self,
        request: &NormalizedRequest,
    ) -> std::result::Result<String, AdapterError> {
        let mut messages = vec![WireMessage {
            role: "system".into(),
            content: SYSTEM_PREAMBLE.into(),
        }];
        messages.extend(request.messages.iter().map(|m| WireMessage {
            role: m.role.as_str().into(),
            content: m.content.clone(),
        }));

        let payload = ChatRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.config.default_model.clone()),
            messages,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AdapterError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Self::extract_text(&body))
    }
}

// Chat-completions API types

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

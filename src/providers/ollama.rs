//! Ollama adapter (local inference server)
//!
//! Talks to a `generate`-style endpoint: the conversation is collapsed into
//! a single prompt string and the reply text lives at `response` in the
//! returned JSON.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::{AdapterConfig, ProviderKind},
    error::{AdapterError, RelayError, Result},
    messages::NormalizedRequest,
};

use super::{ProviderAdapter, REQUEST_TIMEOUT};

/// Adapter for a local Ollama server
pub struct OllamaAdapter {
    client: Client,
    config: AdapterConfig,
    base_url: String,
}

impl OllamaAdapter {
    /// Create a new Ollama adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: AdapterConfig) -> Result<Self> {
        let base_url = config.effective_endpoint(ProviderKind::Ollama);
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RelayError::Config(format!("ollama http client: {e}")))?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Best-effort extraction of the reply text.
    ///
    /// Tries `response`, then the first array element's `content`; a shape
    /// mismatch degrades to the raw body rather than failing.
    fn extract_text(body: &str) -> String {
        if let Ok(value) = serde_json::from_str::<Value>(body) {
            if let Some(text) = value.get("response").and_then(Value::as_str) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
            if let Some(text) = value
                .get(0)
                .and_then(|first| first.get("content"))
                .and_then(Value::as_str)
            {
                return text.to_string();
            }
        }
        body.to_string()
    }
}

#[async_trait]
impl ProviderAdapter for OllamaAdapter {
    fn name(&self) -> &'static str {
        ProviderKind::Ollama.as_str()
    }

    async fn invoke(
        &self,
        request: &NormalizedRequest,
    ) -> std::result::Result<String, AdapterError> {
        let payload = GenerateRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.config.default_model.clone()),
            prompt: request.flattened_prompt(),
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
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

// Ollama API types

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn adapter_for(server: &MockServer) -> OllamaAdapter {
        OllamaAdapter::new(AdapterConfig {
            endpoint: Some(server.uri()),
            api_key: None,
            default_model: "llama3".into(),
        })
        .unwrap()
    }

    fn hello_request() -> NormalizedRequest {
        NormalizedRequest::from_parts(None, Some("Hello".into()), None, None).unwrap()
    }

    #[tokio::test]
    async fn test_collapses_prompt_and_extracts_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(
                json!({"model": "llama3", "prompt": "Hello", "stream": false}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Hi there"})))
            .mount(&server)
            .await;

        let text = adapter_for(&server).invoke(&hello_request()).await.unwrap();
        assert_eq!(text, "Hi there");
    }

    #[tokio::test]
    async fn test_shape_mismatch_degrades_to_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let text = adapter_for(&server).invoke(&hello_request()).await.unwrap();
        assert!(!text.is_empty());
        assert!(text.contains("unexpected"));
    }

    #[tokio::test]
    async fn test_array_content_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"content": "from array"}])),
            )
            .mount(&server)
            .await;

        let text = adapter_for(&server).invoke(&hello_request()).await.unwrap();
        assert_eq!(text, "from array");
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_hard() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let err = adapter_for(&server)
            .invoke(&hello_request())
            .await
            .unwrap_err();
        match err {
            AdapterError::UpstreamStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "model not loaded");
            }
            AdapterError::Transport(_) => panic!("expected upstream status error"),
        }
    }
}

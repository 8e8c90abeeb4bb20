//! Legacy completions adapter (lowest-priority fallback)
//!
//! Targets OpenAI-compatible `completions` endpoints: the conversation is
//! collapsed into a single prompt and the reply text lives at
//! `choices[0].text`. Can be force-enabled by flag without an API key, in
//! which case a dummy bearer token is sent (local OpenAI-compatible servers
//! ignore it).

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::{AdapterConfig, ProviderKind},
    error::{AdapterError, RelayError, Result},
    messages::NormalizedRequest,
};

use super::{ProviderAdapter, REQUEST_TIMEOUT};

/// Adapter for legacy completions gateways
pub struct CompletionsAdapter {
    client: Client,
    config: AdapterConfig,
    base_url: String,
}

impl CompletionsAdapter {
    /// Create a new completions adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be constructed.
    pub fn new(config: AdapterConfig, fallback: bool) -> Result<Self> {
        let api_key = match config.api_key.clone() {
            Some(key) => key,
            None if fallback => "dummy-key".to_string(),
            None => String::new(),
        };
        let base_url = config.effective_endpoint(ProviderKind::OpenAI);

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
            .map_err(|e| RelayError::Config(format!("openai http client: {e}")))?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Extract `choices[0].text`, degrading to the raw body on a shape
    /// mismatch.
    fn extract_text(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .pointer("/choices/0/text")
                    .and_then(Value::as_str)
                    .map(String::from)
            })
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl ProviderAdapter for CompletionsAdapter {
    fn name(&self) -> &'static str {
        ProviderKind::OpenAI.as_str()
    }

    async fn invoke(
        &self,
        request: &NormalizedRequest,
    ) -> std::result::Result<String, AdapterError> {
        let payload = CompletionRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.config.default_model.clone()),
            prompt: request.flattened_prompt(),
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/completions", self.base_url))
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

// Completions API types

#[derive(Debug, Clone, Serialize)]
struct CompletionRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::messages::ChatMessage;

    use super::*;

    fn adapter_for(server: &MockServer) -> CompletionsAdapter {
        CompletionsAdapter::new(
            AdapterConfig {
                endpoint: Some(server.uri()),
                api_key: Some("sk-test".into()),
                default_model: "gpt-3.5-turbo-instruct".into(),
            },
            false,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_collapses_messages_and_extracts_choice_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-3.5-turbo-instruct",
                "prompt": "first\nsecond"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"choices": [{"text": "done"}]})),
            )
            .mount(&server)
            .await;

        let request = NormalizedRequest::from_parts(
            Some(vec![ChatMessage::user("first"), ChatMessage::user("second")]),
            None,
            None,
            None,
        )
        .unwrap();
        let text = adapter_for(&server).invoke(&request).await.unwrap();
        assert_eq!(text, "done");
    }

    #[tokio::test]
    async fn test_missing_choices_degrades_to_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"object": "list"})))
            .mount(&server)
            .await;

        let request =
            NormalizedRequest::from_parts(None, Some("hi".into()), None, None).unwrap();
        let text = adapter_for(&server).invoke(&request).await.unwrap();
        assert!(text.contains("list"));
    }

    #[test]
    fn test_fallback_uses_dummy_key() {
        let adapter = CompletionsAdapter::new(
            AdapterConfig {
                endpoint: None,
                api_key: None,
                default_model: "gpt-3.5-turbo-instruct".into(),
            },
            true,
        );
        assert!(adapter.is_ok());
    }
}

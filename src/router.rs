//! Request routing over the provider registry
//!
//! Exactly one provider is attempted per request, chosen purely by static
//! priority and configuration presence. A live call failing does not trigger
//! the next provider; only an empty registry falls through, to the mock
//! responder, which cannot fail.

use crate::{
    error::{RelayError, Result},
    messages::{NormalizedRequest, NormalizedResponse},
    providers::{mock, ProviderRegistry},
};

/// Route one normalized request to the first available provider.
///
/// # Errors
///
/// Returns [`RelayError::Adapter`] tagged with the provider name when the
/// selected backend fails hard (transport failure or non-success status).
/// Never errors when no provider is configured.
pub async fn dispatch(
    registry: &ProviderRegistry,
    request: &NormalizedRequest,
) -> Result<NormalizedResponse> {
    let Some(adapter) = registry.first() else {
        tracing::debug!("no provider configured, answering via mock responder");
        return Ok(mock::respond(request));
    };

    tracing::debug!(provider = adapter.name(), "invoking provider");
    match adapter.invoke(request).await {
        Ok(text) => Ok(NormalizedResponse::new(text, adapter.name())),
        Err(source) => Err(RelayError::adapter(adapter.name(), source)),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::{
        config::ProviderKind,
        error::AdapterError,
        messages::EMPTY_CONTENT_SENTINEL,
        providers::ProviderAdapter,
    };

    use super::*;

    struct StubAdapter {
        name: &'static str,
        reply: std::result::Result<&'static str, u16>,
    }

    #[async_trait]
    impl ProviderAdapter for StubAdapter {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn invoke(
            &self,
            _request: &NormalizedRequest,
        ) -> std::result::Result<String, AdapterError> {
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(AdapterError::UpstreamStatus {
                    status,
                    body: "boom".into(),
                }),
            }
        }
    }

    fn registry_of(adapters: Vec<StubAdapter>) -> ProviderRegistry {
        let boxed = adapters
            .into_iter()
            .map(|a| Box::new(a) as Box<dyn ProviderAdapter>)
            .collect();
        ProviderRegistry::new(boxed, vec![(ProviderKind::Ollama, true)])
    }

    fn hello() -> NormalizedRequest {
        NormalizedRequest::from_parts(None, Some("Hello".into()), None, None).unwrap()
    }

    #[test]
    fn test_first_adapter_wins() {
        let registry = registry_of(vec![
            StubAdapter {
                name: "ollama",
                reply: Ok("from ollama"),
            },
            StubAdapter {
                name: "groq",
                reply: Ok("from groq"),
            },
        ]);
        let resp = tokio_test::block_on(dispatch(&registry, &hello())).unwrap();
        assert_eq!(resp.text, "from ollama");
        assert_eq!(resp.provider, "ollama");
    }

    #[test]
    fn test_failure_does_not_fall_through() {
        let registry = registry_of(vec![
            StubAdapter {
                name: "ollama",
                reply: Err(500),
            },
            StubAdapter {
                name: "groq",
                reply: Ok("unreachable"),
            },
        ]);
        let err = tokio_test::block_on(dispatch(&registry, &hello())).unwrap_err();
        match err {
            RelayError::Adapter { provider, .. } => assert_eq!(provider, "ollama"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_registry_answers_via_mock() {
        let registry = ProviderRegistry::new(vec![], vec![]);
        let resp = tokio_test::block_on(dispatch(&registry, &hello())).unwrap();
        assert_eq!(resp.provider, "mock");
        assert!(resp.text.contains("Hello"));
    }

    #[test]
    fn test_blank_provider_text_becomes_sentinel() {
        let registry = registry_of(vec![StubAdapter {
            name: "ollama",
            reply: Ok(""),
        }]);
        let resp = tokio_test::block_on(dispatch(&registry, &hello())).unwrap();
        assert_eq!(resp.text, EMPTY_CONTENT_SENTINEL);
    }
}

//! Error types for the relay

use thiserror::Error;

/// Result type alias using [`RelayError`]
pub type Result<T> = std::result::Result<T, RelayError>;

/// Failure modes of a single provider invocation.
///
/// A provider call has exactly two hard failure modes; anything else
/// (an unexpected JSON shape in an otherwise successful reply) is handled
/// inside the adapter as a soft fallback and never reaches this type.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The backend answered with a non-success status
    #[error("upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The backend could not be reached (DNS, connect, timeout, body read)
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        AdapterError::Transport(err.to_string())
    }
}

/// Main error type for the relay
#[derive(Debug, Error)]
pub enum RelayError {
    /// Malformed or missing request input; never retried
    #[error("invalid request: {0}")]
    Validation(String),

    /// The selected provider failed hard; tagged with the provider name
    #[error("provider '{provider}' failed: {source}")]
    Adapter {
        provider: &'static str,
        #[source]
        source: AdapterError,
    },

    /// Startup configuration error
    #[error("invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    /// Tag an adapter failure with the provider it came from
    #[must_use]
    pub fn adapter(provider: &'static str, source: AdapterError) -> Self {
        RelayError::Adapter { provider, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_error_display() {
        let err = RelayError::adapter(
            "groq",
            AdapterError::UpstreamStatus {
                status: 401,
                body: "{\"error\":\"bad key\"}".into(),
            },
        );
        let rendered = err.to_string();
        assert!(rendered.contains("groq"));
        assert!(rendered.contains("401"));
    }
}

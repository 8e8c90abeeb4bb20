//! HTTP boundary
//!
//! Thin axum layer over the router: parse the incoming body, normalize it,
//! dispatch, serialize the result. All provider semantics live below this
//! module.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    error::{AdapterError, RelayError},
    messages::{ChatMessage, NormalizedRequest},
    providers::ProviderRegistry,
    router,
};

/// Registry handle injected into every handler
pub type SharedRegistry = Arc<ProviderRegistry>;

/// Build the full axum router
pub fn build_router(registry: ProviderRegistry) -> Router {
    let shared: SharedRegistry = Arc::new(registry);

    Router::new()
        .route("/", get(health))
        .route("/api/ai", post(relay_chat))
        .route("/api/chat", post(relay_chat))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

/// Inbound body: either a `messages` array or a legacy `prompt` string
#[derive(Debug, Deserialize)]
struct ChatRequestBody {
    messages: Option<Vec<ChatMessage>>,
    prompt: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
}

/// Outbound body on success
#[derive(Debug, Serialize)]
struct ChatResponseBody {
    output: String,
    provider: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    providers: BTreeMap<&'static str, bool>,
}

/// `GET /` — liveness plus which providers are enabled
async fn health(State(registry): State<SharedRegistry>) -> Json<HealthResponse> {
    let providers = registry
        .statuses()
        .iter()
        .map(|&(kind, enabled)| (kind.as_str(), enabled))
        .collect();
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        providers,
    })
}

/// `POST /api/ai` and `POST /api/chat` — relay one chat request
async fn relay_chat(
    State(registry): State<SharedRegistry>,
    Json(body): Json<ChatRequestBody>,
) -> Result<Json<ChatResponseBody>, RelayError> {
    let request_id = Uuid::new_v4();
    let request = NormalizedRequest::from_parts(
        body.messages,
        body.prompt,
        body.model,
        body.temperature,
    )?;

    tracing::info!(%request_id, messages = request.messages.len(), "relaying chat request");
    match router::dispatch(&registry, &request).await {
        Ok(response) => {
            tracing::info!(%request_id, provider = %response.provider, "request served");
            Ok(Json(ChatResponseBody {
                output: response.text,
                provider: response.provider,
            }))
        }
        Err(err) => {
            tracing::error!(%request_id, error = %err, "provider failure");
            Err(err)
        }
    }
}

/// Error body mirroring the success shape, with the failing provider tagged
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<&'static str>,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            RelayError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message,
                    provider: None,
                },
            ),
            RelayError::Adapter { provider, source } => match source {
                // Upstream status codes pass through; transport failures are
                // the relay's own 502.
                AdapterError::UpstreamStatus { status, body } => (
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                    ErrorBody {
                        error: body,
                        provider: Some(provider),
                    },
                ),
                AdapterError::Transport(message) => (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        error: message,
                        provider: Some(provider),
                    },
                ),
            },
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: other.to_string(),
                    provider: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

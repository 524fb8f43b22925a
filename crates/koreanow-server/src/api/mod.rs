//! HTTP adapter for the chat proxy.
//!
//! Both serverless layouts the frontend knows about are served by the same
//! handler: `/api/chat` and `/.netlify/functions/chat`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::any,
    Extension, Json, Router,
};
use koreanow_openai::CompletionApi;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};
use crate::proxy::{self, ChatDefaults, ErrorKind, ProxyError, ProxyReply, ProxyRequest};

pub const CHAT_ROUTES: [&str; 2] = ["/api/chat", "/.netlify/functions/chat"];

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

pub struct AppState<A> {
    /// `None` when no API key was configured at startup.
    pub backend: Option<Arc<A>>,
    pub defaults: Arc<ChatDefaults>,
}

impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            defaults: Arc::clone(&self.defaults),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(rename = "type")]
    kind: ErrorKind,
}

impl IntoResponse for ProxyReply {
    fn into_response(self) -> Response {
        match self {
            Self::Preflight => StatusCode::OK.into_response(),
            Self::Health(health) => (StatusCode::OK, Json(health)).into_response(),
            Self::Chat(reply) => (StatusCode::OK, Json(reply)).into_response(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match self.kind {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::Configuration | ErrorKind::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: &self.message,
            kind: self.kind,
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the router. Every response, errors and 404s included, carries the
/// same fixed CORS header set; OPTIONS is answered by the handler itself.
pub fn build_app<A: CompletionApi>(state: AppState<A>) -> Router {
    let router = CHAT_ROUTES
        .iter()
        .fold(Router::new(), |router, route| router.route(route, any(chat::<A>)));

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static(ALLOWED_METHODS),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static(ALLOWED_HEADERS),
                ))
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn chat<A: CompletionApi>(
    State(state): State<AppState<A>>,
    Extension(req_id): Extension<RequestId>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = ProxyRequest {
        method,
        headers,
        body,
    };

    match proxy::handle(state.backend.as_deref(), &state.defaults, request).await {
        Ok(reply) => reply.into_response(),
        Err(e) => {
            tracing::warn!(
                request_id = %req_id.0,
                kind = ?e.kind,
                error = %e,
                "chat request rejected"
            );
            e.into_response()
        }
    }
}

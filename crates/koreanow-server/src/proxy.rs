//! Chat proxy core.
//!
//! Platform adapters normalise an inbound request into a [`ProxyRequest`]
//! once; [`handle`] works only on that type and returns either a typed
//! [`ProxyReply`] or a [`ProxyError`] whose [`ErrorKind`] decides the status.

use axum::body::Bytes;
use axum::http::{header::CONTENT_TYPE, HeaderMap, Method};
use koreanow_openai::{
    ChatMessage, Choice, CompletionApi, CompletionRequest, CompletionResponse, Usage,
};
use serde::{Deserialize, Serialize};

pub const HEALTH_MESSAGE: &str = "OpenAI 프록시 서버 정상 작동 중";

/// Method, headers and raw body of one inbound request.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Values applied when the client omits them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatDefaults {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for ChatDefaults {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_owned(),
            temperature: 0.9,
            max_tokens: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
}

/// Successful chat response: the first upstream choice plus token usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

impl From<CompletionResponse> for ChatReply {
    fn from(response: CompletionResponse) -> Self {
        Self {
            choices: response.choices.into_iter().take(1).collect(),
            usage: response.usage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyReply {
    /// CORS preflight; empty body.
    Preflight,
    Health(HealthStatus),
    Chat(ChatReply),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadRequest,
    MethodNotAllowed,
    Configuration,
    Upstream,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProxyError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ProxyError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }
}

/// POST body. Every field but `messages` falls back to [`ChatDefaults`].
#[derive(Debug, Deserialize)]
struct ChatBody {
    messages: Option<Vec<ChatMessage>>,
    model: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

/// Routes one request by method.
///
/// `backend` is `None` when no API credential was configured; that only
/// surfaces once a POST has passed validation.
///
/// # Errors
///
/// - [`ErrorKind::BadRequest`]: empty body, malformed JSON, or no `messages`.
/// - [`ErrorKind::Configuration`]: POST without a configured backend.
/// - [`ErrorKind::Upstream`]: the completion call failed.
/// - [`ErrorKind::MethodNotAllowed`]: anything other than OPTIONS, GET or POST.
pub async fn handle<A: CompletionApi>(
    backend: Option<&A>,
    defaults: &ChatDefaults,
    request: ProxyRequest,
) -> Result<ProxyReply, ProxyError> {
    match request.method {
        Method::OPTIONS => Ok(ProxyReply::Preflight),
        Method::GET => Ok(ProxyReply::Health(HealthStatus {
            status: "ok",
            message: HEALTH_MESSAGE,
        })),
        Method::POST => {
            tracing::debug!(
                content_type = request
                    .headers
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or(""),
                bytes = request.body.len(),
                "chat request received"
            );
            chat(backend, defaults, &request.body)
                .await
                .map(ProxyReply::Chat)
        }
        _ => Err(ProxyError::new(
            ErrorKind::MethodNotAllowed,
            "Method not allowed",
        )),
    }
}

async fn chat<A: CompletionApi>(
    backend: Option<&A>,
    defaults: &ChatDefaults,
    body: &[u8],
) -> Result<ChatReply, ProxyError> {
    let request = completion_request(defaults, body)?;

    let Some(backend) = backend else {
        return Err(ProxyError::new(
            ErrorKind::Configuration,
            "OPENAI_API_KEY가 설정되지 않았습니다.",
        ));
    };

    match backend.complete(&request).await {
        Ok(response) => Ok(ChatReply::from(response)),
        Err(e) => {
            tracing::error!(error = %e, model = %request.model, "completion call failed");
            Err(ProxyError::new(
                ErrorKind::Upstream,
                format!("OpenAI API 오류: {e}"),
            ))
        }
    }
}

/// Validates a POST body and fills in defaults.
fn completion_request(defaults: &ChatDefaults, body: &[u8]) -> Result<CompletionRequest, ProxyError> {
    if body.is_empty() {
        return Err(ProxyError::bad_request("요청 본문이 비어있습니다."));
    }

    let parsed: ChatBody = serde_json::from_slice(body)
        .map_err(|e| ProxyError::bad_request(format!("JSON 파싱 오류: {e}")))?;

    let messages = parsed
        .messages
        .filter(|messages| !messages.is_empty())
        .ok_or_else(|| ProxyError::bad_request("messages 필드가 필요합니다."))?;

    Ok(CompletionRequest {
        model: parsed.model.unwrap_or_else(|| defaults.model.clone()),
        messages,
        temperature: parsed.temperature.unwrap_or(defaults.temperature),
        max_tokens: parsed.max_tokens.unwrap_or(defaults.max_tokens),
    })
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;

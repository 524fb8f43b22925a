//! HTTP client for `POST {base}/chat/completions`.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::OpenAiError;
use crate::types::{CompletionRequest, CompletionResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Anything that can turn a [`CompletionRequest`] into a [`CompletionResponse`].
pub trait CompletionApi: Send + Sync + 'static {
    /// Performs one completion call.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, OpenAiError>> + Send;
}

/// Client for an OpenAI-compatible chat-completion endpoint.
///
/// Only a connect timeout is set; a completion call waits for as long as the
/// upstream takes.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl OpenAiClient {
    /// Creates a client pointed at the public API.
    ///
    /// # Errors
    ///
    /// See [`OpenAiClient::with_base_url`].
    pub fn new(api_key: &str) -> Result<Self, OpenAiError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (compatible gateways, wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`OpenAiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`OpenAiError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, OpenAiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        // Trailing slash so `join` appends instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join("chat/completions"))
            .map_err(|e| OpenAiError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends one chat-completion request.
    ///
    /// # Errors
    ///
    /// - [`OpenAiError::Http`] on network failure.
    /// - [`OpenAiError::UpstreamStatus`] on a non-2xx status; the message is
    ///   the API's `error.message` when present, else the raw body.
    /// - [`OpenAiError::Deserialize`] if a 2xx body does not match the expected shape.
    /// - [`OpenAiError::EmptyChoices`] if the response has no choices.
    pub async fn create_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, OpenAiError> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(OpenAiError::UpstreamStatus {
                status: status.as_u16(),
                message: upstream_error_message(&body),
            });
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&body).map_err(|e| OpenAiError::Deserialize {
                context: self.endpoint.to_string(),
                source: e,
            })?;

        if parsed.choices.is_empty() {
            return Err(OpenAiError::EmptyChoices);
        }

        tracing::debug!(
            total_tokens = parsed.usage.total_tokens,
            "chat completion succeeded"
        );
        Ok(parsed)
    }
}

impl CompletionApi for OpenAiClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, OpenAiError> {
        self.create_completion(request).await
    }
}

/// Pulls `error.message` out of an OpenAI-style error body.
fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_owned())
}

use thiserror::Error;

/// Errors returned by the chat-completion client.
#[derive(Debug, Error)]
pub enum OpenAiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("upstream returned HTTP {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("completion response contained no choices")]
    EmptyChoices,

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

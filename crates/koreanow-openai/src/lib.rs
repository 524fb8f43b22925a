//! Typed client for an OpenAI-compatible chat-completion API.
//!
//! The proxy server depends on the [`CompletionApi`] trait rather than on
//! [`OpenAiClient`] directly, so handler tests can substitute a fake backend.

pub mod client;
pub mod error;
pub mod types;

pub use client::{CompletionApi, OpenAiClient, DEFAULT_BASE_URL};
pub use error::OpenAiError;
pub use types::{ChatMessage, Choice, ChoiceMessage, CompletionRequest, CompletionResponse, Usage};

//! Fake completion backend shared by handler and router tests.

use std::sync::Mutex;

use koreanow_openai::{
    Choice, ChoiceMessage, CompletionApi, CompletionRequest, CompletionResponse, OpenAiError,
    Usage,
};

/// Returns a canned reply (or failure) and records every request it sees.
pub struct FakeBackend {
    reply: Result<CompletionResponse, String>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl FakeBackend {
    pub fn answering(content: &str) -> Self {
        Self {
            reply: Ok(CompletionResponse {
                choices: vec![
                    Choice {
                        message: ChoiceMessage {
                            role: "assistant".to_owned(),
                            content: content.to_owned(),
                        },
                    },
                    Choice {
                        message: ChoiceMessage {
                            role: "assistant".to_owned(),
                            content: "second choice".to_owned(),
                        },
                    },
                ],
                usage: Usage {
                    prompt_tokens: 12,
                    completion_tokens: 8,
                    total_tokens: 20,
                },
            }),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_owned()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen.lock().expect("lock").clone()
    }
}

impl CompletionApi for FakeBackend {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, OpenAiError> {
        self.seen.lock().expect("lock").push(request.clone());
        self.reply
            .clone()
            .map_err(|message| OpenAiError::UpstreamStatus {
                status: 502,
                message,
            })
    }
}

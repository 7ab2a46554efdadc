use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmError, TextGenerator};

/// Scripted [`TextGenerator`] for tests.
///
/// Replies are served in FIFO order; an exhausted queue fails the call, which
/// exercises the degrade paths.
#[derive(Default)]
pub struct MockTextGenerator {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<String>>,
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies
            .lock()
            .expect("mock lock")
            .push_back(Ok(reply.into()));
    }

    /// Queues a failed call.
    pub fn push_failure(&self, reason: impl Into<String>) {
        self.replies
            .lock()
            .expect("mock lock")
            .push_back(Err(reason.into()));
    }

    /// Prompts observed so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().expect("mock lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock lock").len()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .expect("mock lock")
            .push(prompt.to_string());

        match self.replies.lock().expect("mock lock").pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(reason)) => Err(LlmError::RequestFailed { reason }),
            None => Err(LlmError::RequestFailed {
                reason: "mock reply queue exhausted".to_string(),
            }),
        }
    }
}

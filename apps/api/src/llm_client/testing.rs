//! Scripted in-memory model for tests. Responses are served in the order they were queued.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LanguageModel, LlmError};

#[derive(Debug)]
pub enum ScriptedReply {
    Text(String),
    Status(u16),
    Empty,
}

impl ScriptedReply {
    pub fn text(content: impl Into<String>) -> Self {
        ScriptedReply::Text(content.into())
    }
}

#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<ScriptedReply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Shorthand for a script made only of successful completions.
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(ScriptedReply::text))
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Status(status)) => Err(LlmError::Api {
                status,
                message: "scripted failure".to_string(),
            }),
            Some(ScriptedReply::Empty) | None => Err(LlmError::EmptyContent),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

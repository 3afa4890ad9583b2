//! Multi-turn chat over the stateless `generateContent` endpoint.

use crate::client::GeminiClient;
use crate::wire::Content;
use aitools_core::{ChatHandle, Result};

/// A chat that resends its full history on every turn.
#[derive(Debug, Clone)]
pub struct GeminiChat {
    client: GeminiClient,
    history: Vec<Content>,
}

impl GeminiChat {
    pub(crate) fn new(client: GeminiClient, history: Vec<Content>) -> Self {
        Self { client, history }
    }

    /// History plus the pending user turn.
    fn contents_with(&self, prompt: &str) -> Vec<Content> {
        let mut contents = self.history.clone();
        contents.push(Content::user_text(prompt));
        contents
    }

    fn record_turn(&mut self, prompt: &str, reply: &str) {
        self.history.push(Content::user_text(prompt));
        self.history.push(Content::model_text(reply));
    }
}

impl ChatHandle for GeminiChat {
    fn send_message(&mut self, prompt: &str) -> Result<String> {
        let reply = self.client.generate_content(&self.contents_with(prompt))?;
        self.record_turn(prompt, &reply);
        Ok(reply)
    }
}

//! Help chatbot
//!
//! Wraps one prompt call to the hosted text generator. Callers always get a
//! reply; failures turn into a fixed apology.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::chat::{render_prompt, EMPTY_REPLY_FALLBACK, UNAVAILABLE_FALLBACK};
use crate::domain::ports::TextGenerator;
use crate::domain::{ChatbotInput, ChatbotOutput};

pub struct ChatbotService {
    generator: Arc<dyn TextGenerator>,
    max_history_turns: usize,
}

impl ChatbotService {
    pub fn new(generator: Arc<dyn TextGenerator>, max_history_turns: usize) -> Self {
        Self {
            generator,
            max_history_turns,
        }
    }

    pub async fn reply(&self, input: ChatbotInput) -> ChatbotOutput {
        let prompt = render_prompt(&input, self.max_history_turns);

        let (reply, outcome) = match self.generator.generate(&prompt).await {
            Ok(Some(text)) if !text.trim().is_empty() => (text, "success"),
            Ok(_) => {
                warn!("Chatbot model returned an empty reply");
                (EMPTY_REPLY_FALLBACK.to_string(), "empty")
            }
            Err(e) => {
                error!(error = %e, "Chatbot generation failed");
                (UNAVAILABLE_FALLBACK.to_string(), "error")
            }
        };

        metrics::counter!("chatbot_requests_total", "outcome" => outcome).increment(1);
        info!(
            history_turns = input.history.len(),
            outcome,
            "💬 Chatbot replied"
        );
        ChatbotOutput::new(reply)
    }
}

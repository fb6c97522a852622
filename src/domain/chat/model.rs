//! Chatbot input/output and the fixed assistant prompt

/// Reply used when the model produced no usable text.
pub const EMPTY_REPLY_FALLBACK: &str =
    "I'm sorry, I encountered an issue generating a response. Could you try rephrasing or asking again?";

/// Reply used when the text-generation call failed.
pub const UNAVAILABLE_FALLBACK: &str =
    "Apologies, I'm unable to process your request at the moment. Please try again later.";

const PREAMBLE: &str = "You are a friendly and helpful AI assistant for ParkWatch Pass, a smart parking application.
Your goal is to assist users with their questions about booking parking, payments, QR codes, app features, or general parking-related queries.
Keep your responses concise, informative, and easy to understand.";

/// One earlier exchange: what the user said and what the assistant answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub user: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatbotInput {
    pub message: String,
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatbotOutput {
    pub reply: String,
}

impl ChatbotOutput {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

/// Render the prompt sent to the model.
///
/// Only the last `max_turns` exchanges of the history are included.
pub fn render_prompt(input: &ChatbotInput, max_turns: usize) -> String {
    let skip = input.history.len().saturating_sub(max_turns);
    let history = &input.history[skip..];

    let mut prompt = String::with_capacity(PREAMBLE.len() + input.message.len() + 128);
    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\nConversation History:\n");
    for turn in history {
        prompt.push_str("User: ");
        prompt.push_str(&turn.user);
        prompt.push_str("\nAssistant: ");
        prompt.push_str(&turn.model);
        prompt.push('\n');
    }
    prompt.push_str("\nCurrent User Message:\n");
    prompt.push_str(&input.message);
    prompt.push_str("\n\nAssistant Reply:");
    prompt
}

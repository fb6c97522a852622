use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{ChatTurn, ChatbotInput};

/// One earlier exchange of the conversation
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChatTurnDto {
    pub user: String,
    pub model: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChatbotRequest {
    #[validate(length(min = 1, max = 2000, message = "message must be 1-2000 characters"))]
    #[schema(example = "How do I download my QR code?")]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurnDto>,
}

impl From<ChatbotRequest> for ChatbotInput {
    fn from(r: ChatbotRequest) -> Self {
        Self {
            message: r.message,
            history: r
                .history
                .into_iter()
                .map(|t| ChatTurn {
                    user: t.user,
                    model: t.model,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatbotResponse {
    pub reply: String,
}

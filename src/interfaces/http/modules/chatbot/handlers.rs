//! Help chatbot handler

use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::{ChatbotRequest, ChatbotResponse};
use crate::application::ChatbotService;
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct ChatbotState {
    pub chatbot: Arc<ChatbotService>,
}

/// Always 200 once the request is well-formed; generation failures come
/// back as an apology in `reply`.
#[utoipa::path(
    post,
    path = "/api/v1/chatbot",
    tag = "Chatbot",
    request_body = ChatbotRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ApiResponse<ChatbotResponse>),
        (status = 422, description = "Empty or oversized message")
    )
)]
pub async fn chat(
    State(state): State<ChatbotState>,
    ValidatedJson(req): ValidatedJson<ChatbotRequest>,
) -> ApiResult<ChatbotResponse> {
    let output = state.chatbot.reply(req.into()).await;
    Ok(Json(ApiResponse::success(ChatbotResponse {
        reply: output.reply,
    })))
}

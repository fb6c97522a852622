//! Feedback intake handler

use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::{FeedbackReceiptDto, FeedbackRequest};
use crate::application::FeedbackService;
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct FeedbackState {
    pub feedback: Arc<FeedbackService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/feedback",
    tag = "Feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback acknowledged", body = ApiResponse<FeedbackReceiptDto>),
        (status = 422, description = "Invalid form fields")
    )
)]
pub async fn submit_feedback(
    State(state): State<FeedbackState>,
    ValidatedJson(req): ValidatedJson<FeedbackRequest>,
) -> ApiResult<FeedbackReceiptDto> {
    let receipt = state
        .feedback
        .submit(req.into())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(receipt.into())))
}

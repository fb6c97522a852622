//! Simulated scanner handler

use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::ScanResultDto;
use crate::application::ScanSimulator;
use crate::interfaces::http::common::{ApiResponse, ApiResult};

#[derive(Clone)]
pub struct ScanState {
    pub scanner: Arc<ScanSimulator>,
}

#[utoipa::path(
    post,
    path = "/api/v1/scan/simulate",
    tag = "Scanner",
    responses(
        (status = 200, description = "Scan finished; `status` tells success from failure", body = ApiResponse<ScanResultDto>)
    )
)]
pub async fn simulate_scan(State(state): State<ScanState>) -> ApiResult<ScanResultDto> {
    let result = state.scanner.simulate_scan().await;
    Ok(Json(ApiResponse::success(result.into())))
}

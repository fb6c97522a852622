//! Location catalog handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{LocationDto, SpotBoardDto};
use crate::application::BookingWorkflow;
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult};

/// State shared by the location and session handlers
#[derive(Clone)]
pub struct BookingState {
    pub workflow: Arc<BookingWorkflow>,
}

#[utoipa::path(
    get,
    path = "/api/v1/locations",
    tag = "Locations",
    responses(
        (status = 200, description = "All parking locations", body = ApiResponse<Vec<LocationDto>>)
    )
)]
pub async fn list_locations(State(state): State<BookingState>) -> ApiResult<Vec<LocationDto>> {
    let locations = state
        .workflow
        .list_locations()
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(ApiResponse::success(locations)))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/{location_id}",
    tag = "Locations",
    params(("location_id" = String, Path, description = "Location id, e.g. pw_a1")),
    responses(
        (status = 200, description = "Location details", body = ApiResponse<LocationDto>),
        (status = 404, description = "Unknown location")
    )
)]
pub async fn get_location(
    State(state): State<BookingState>,
    Path(location_id): Path<String>,
) -> ApiResult<LocationDto> {
    let location = state.workflow.location(&location_id).map_err(domain_error)?;
    Ok(Json(ApiResponse::success(location.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/{location_id}/spots",
    tag = "Locations",
    params(("location_id" = String, Path, description = "Location id")),
    responses(
        (status = 200, description = "Spot grid with occupied flags", body = ApiResponse<SpotBoardDto>),
        (status = 404, description = "Unknown location")
    )
)]
pub async fn get_spot_board(
    State(state): State<BookingState>,
    Path(location_id): Path<String>,
) -> ApiResult<SpotBoardDto> {
    let board = state
        .workflow
        .spot_board(&location_id)
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(board.into())))
}

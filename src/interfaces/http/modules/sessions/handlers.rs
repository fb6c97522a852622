//! Booking session handlers
//!
//! One endpoint per screen action. Screens that cannot be shown for the
//! current state answer `303 See Other` back to `/`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::dto::{
    BookingRequest, ConfirmationDto, PassDto, PaymentSummaryDto, RefundDto, SelectLocationRequest,
    SelectSpotRequest, SessionDto,
};
use crate::domain::{ConfirmationView, PaymentView};
use crate::interfaces::http::common::{
    domain_error, redirect_home, ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson,
};
use crate::interfaces::http::modules::locations::BookingState;

#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    tag = "Sessions",
    responses(
        (status = 201, description = "Session opened", body = ApiResponse<SessionDto>)
    )
)]
pub async fn create_session(
    State(state): State<BookingState>,
) -> (StatusCode, Json<ApiResponse<SessionDto>>) {
    let snapshot = state.workflow.open_session().await;
    (StatusCode::CREATED, Json(ApiResponse::success(snapshot.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions/{session_id}",
    tag = "Sessions",
    params(("session_id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session state", body = ApiResponse<SessionDto>),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_session(
    State(state): State<BookingState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<SessionDto> {
    let snapshot = state
        .workflow
        .snapshot(session_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(snapshot.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{session_id}",
    tag = "Sessions",
    params(("session_id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session closed", body = ApiResponse<EmptyData>),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn delete_session(
    State(state): State<BookingState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<EmptyData> {
    state
        .workflow
        .close_session(session_id)
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/location",
    tag = "Sessions",
    params(("session_id" = Uuid, Path, description = "Session id")),
    request_body = SelectLocationRequest,
    responses(
        (status = 200, description = "Location toggled", body = ApiResponse<SessionDto>),
        (status = 404, description = "Unknown session or location"),
        (status = 409, description = "Booking already confirmed")
    )
)]
pub async fn select_location(
    State(state): State<BookingState>,
    Path(session_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<SelectLocationRequest>,
) -> ApiResult<SessionDto> {
    let snapshot = state
        .workflow
        .select_location(session_id, &req.location_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(snapshot.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/spot",
    tag = "Sessions",
    params(("session_id" = Uuid, Path, description = "Session id")),
    request_body = SelectSpotRequest,
    responses(
        (status = 200, description = "Spot toggled", body = ApiResponse<SessionDto>),
        (status = 400, description = "No location selected or unknown spot"),
        (status = 409, description = "Spot is occupied or booking already confirmed")
    )
)]
pub async fn select_spot(
    State(state): State<BookingState>,
    Path(session_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<SelectSpotRequest>,
) -> ApiResult<SessionDto> {
    let snapshot = state
        .workflow
        .select_spot(session_id, &req.spot_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(snapshot.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/booking",
    tag = "Sessions",
    params(("session_id" = Uuid, Path, description = "Session id")),
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Booking priced and ready for payment", body = ApiResponse<SessionDto>),
        (status = 400, description = "Location or spot missing"),
        (status = 422, description = "Invalid duration or plate")
    )
)]
pub async fn submit_booking(
    State(state): State<BookingState>,
    Path(session_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<BookingRequest>,
) -> ApiResult<SessionDto> {
    let snapshot = state
        .workflow
        .submit_booking(session_id, req.into())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(snapshot.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions/{session_id}/payment",
    tag = "Sessions",
    params(("session_id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Payment summary", body = ApiResponse<PaymentSummaryDto>),
        (status = 303, description = "Booking incomplete, back to start")
    )
)]
pub async fn get_payment(
    State(state): State<BookingState>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let view = state
        .workflow
        .payment_view(session_id)
        .await
        .map_err(domain_error)?;

    Ok(match view {
        PaymentView::Ready {
            location,
            spot,
            details,
        } => Json(ApiResponse::success(PaymentSummaryDto::new(location, spot, details)))
            .into_response(),
        PaymentView::Redirect { reason } => redirect_home(reason),
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/payment/confirm",
    tag = "Sessions",
    params(("session_id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Payment accepted, pass issued", body = ApiResponse<SessionDto>),
        (status = 400, description = "Nothing to pay for"),
        (status = 409, description = "Already paid, or interrupted by a change to the booking")
    )
)]
pub async fn confirm_payment(
    State(state): State<BookingState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<SessionDto> {
    let snapshot = state
        .workflow
        .confirm_payment(session_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(snapshot.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions/{session_id}/confirmation",
    tag = "Sessions",
    params(("session_id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Issued pass or refund notice", body = ApiResponse<ConfirmationDto>),
        (status = 303, description = "No active booking, back to start")
    )
)]
pub async fn get_confirmation(
    State(state): State<BookingState>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let view = state
        .workflow
        .confirmation_view(session_id)
        .await
        .map_err(domain_error)?;

    let dto = match view {
        ConfirmationView::Confirmed {
            details,
            payload,
            download_file_name,
        } => ConfirmationDto {
            status: "confirmed".to_string(),
            pass: Some(PassDto::new(details, payload, download_file_name)),
            refund: None,
        },
        ConfirmationView::Cancelled { notice } => ConfirmationDto {
            status: "cancelled".to_string(),
            pass: None,
            refund: Some(notice.into()),
        },
        ConfirmationView::Redirect { reason } => return Ok(redirect_home(reason)),
    };
    Ok(Json(ApiResponse::success(dto)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/cancel",
    tag = "Sessions",
    params(("session_id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<RefundDto>),
        (status = 400, description = "No confirmed booking")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<RefundDto> {
    let notice = state
        .workflow
        .cancel_booking(session_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(notice.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/reset",
    tag = "Sessions",
    params(("session_id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session back to its initial state", body = ApiResponse<SessionDto>)
    )
)]
pub async fn reset_booking(
    State(state): State<BookingState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<SessionDto> {
    let snapshot = state
        .workflow
        .reset_booking(session_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(snapshot.into())))
}

//! Reservation HTTP handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::{CancelReservationRequest, ReservationDto, ReserveRoomRequest};
use crate::interfaces::http::common::{ApiResponse, ApiResult, CreatedResult, ValidatedJson};
use crate::interfaces::http::modules::rooms::LedgerState;

/// `POST /api/v1/rooms/reserve`
pub async fn reserve_room(
    State(state): State<LedgerState>,
    ValidatedJson(request): ValidatedJson<ReserveRoomRequest>,
) -> CreatedResult<ReservationDto> {
    let reservation = state.ledger.reserve(request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(reservation.into())),
    ))
}

/// `POST /api/v1/rooms/cancel`
pub async fn cancel_reservation(
    State(state): State<LedgerState>,
    ValidatedJson(request): ValidatedJson<CancelReservationRequest>,
) -> ApiResult<ReservationDto> {
    let reservation = state.ledger.cancel(request.reservation_id.trim()).await?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

/// `GET /api/v1/rooms/booked`
pub async fn list_booked(State(state): State<LedgerState>) -> ApiResult<Vec<ReservationDto>> {
    let booked = state.ledger.list_booked().await?;
    let booked: Vec<ReservationDto> = booked.into_iter().map(ReservationDto::from).collect();
    Ok(Json(ApiResponse::success(booked)))
}

/// `GET /api/v1/reservations/{id}`
pub async fn get_reservation(
    State(state): State<LedgerState>,
    Path(id): Path<String>,
) -> ApiResult<ReservationDto> {
    let reservation = state.ledger.get_reservation(&id).await?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

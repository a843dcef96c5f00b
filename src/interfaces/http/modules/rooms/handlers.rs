//! Room inventory handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::{AddRoomRequest, AvailabilitySummaryDto, RoomDto};
use crate::application::ReservationLedger;
use crate::domain::RoomType;
use crate::interfaces::http::common::{
    parse_room_number, ApiResponse, ApiResult, CreatedResult, ValidatedJson,
};

/// State shared by room and reservation handlers
#[derive(Clone)]
pub struct LedgerState {
    pub ledger: Arc<ReservationLedger>,
}

/// `GET /api/v1/rooms`
pub async fn list_rooms(State(state): State<LedgerState>) -> ApiResult<Vec<RoomDto>> {
    let rooms = state.ledger.list_rooms().await?;
    let rooms: Vec<RoomDto> = rooms.into_iter().map(RoomDto::from).collect();
    Ok(Json(ApiResponse::success(rooms)))
}

/// `POST /api/v1/rooms`
pub async fn add_room(
    State(state): State<LedgerState>,
    ValidatedJson(request): ValidatedJson<AddRoomRequest>,
) -> CreatedResult<RoomDto> {
    let room_type: RoomType = request.room_type.parse()?;
    let room = state
        .ledger
        .add_room(request.room_number, room_type, request.price)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(room.into()))))
}

/// `GET /api/v1/rooms/available`
pub async fn list_available(State(state): State<LedgerState>) -> ApiResult<Vec<RoomDto>> {
    let rooms = state.ledger.list_available().await?;
    let rooms: Vec<RoomDto> = rooms.into_iter().map(RoomDto::from).collect();
    Ok(Json(ApiResponse::success(rooms)))
}

/// `GET /api/v1/rooms/available/summary`
pub async fn available_summary(
    State(state): State<LedgerState>,
) -> ApiResult<Vec<AvailabilitySummaryDto>> {
    let summary = state.ledger.available_summary().await?;
    let summary: Vec<AvailabilitySummaryDto> = summary.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(summary)))
}

/// `GET /api/v1/rooms/{roomNumber}`
pub async fn get_room(
    State(state): State<LedgerState>,
    Path(room_number): Path<String>,
) -> ApiResult<RoomDto> {
    let room_number = parse_room_number(&room_number)?;
    let room = state.ledger.get_room(room_number).await?;
    Ok(Json(ApiResponse::success(room.into())))
}

/// `DELETE /api/v1/rooms/{roomNumber}`
pub async fn remove_room(
    State(state): State<LedgerState>,
    Path(room_number): Path<String>,
) -> ApiResult<RoomDto> {
    let room_number = parse_room_number(&room_number)?;
    let room = state.ledger.remove_room(room_number).await?;
    Ok(Json(ApiResponse::success(room.into())))
}

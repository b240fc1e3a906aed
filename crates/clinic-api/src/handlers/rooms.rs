// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Room handlers.
//!
//! Every write goes through the [`RoomCoordinator`](clinic_core::RoomCoordinator),
//! which serializes changes per room and keeps occupancy consistent.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;

use clinic_core::{CoreError, Entity, Patient, PatientId, Room, RoomId, RoomInput, RoomStatus};

use super::matches;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{IdPath, JsonBody, QueryParams};
use crate::response::{Created, MessageResponse};
use crate::state::AppState;

/// Query filters for listing rooms.
#[derive(Debug, Default, Deserialize)]
pub struct RoomFilter {
    /// Only rooms in this status.
    pub status: Option<RoomStatus>,
    /// Only rooms of this type.
    #[serde(rename = "type")]
    pub room_type: Option<String>,
}

/// Assignment request body. A null or absent `patientId` releases the room.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    /// The patient to place in the room.
    #[serde(default)]
    pub patient_id: Option<PatientId>,
}

/// GET /api/rooms
///
/// Ordered by room number.
pub async fn list_rooms(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<RoomFilter>,
) -> ApiResult<Json<Vec<Room>>> {
    let mut rooms = state
        .store
        .rooms()
        .list(&|r: &Room| {
            matches(&filter.status, &r.status()) && matches(&filter.room_type, &r.room_type)
        })
        .await?;
    rooms.sort_by(|a, b| a.room_number.cmp(&b.room_number));
    Ok(Json(rooms))
}

/// GET /api/rooms/{id}
pub async fn get_room(
    State(state): State<AppState>,
    IdPath(id): IdPath<RoomId>,
) -> ApiResult<Json<Room>> {
    Ok(Json(state.store.rooms().require(id).await?))
}

/// POST /api/rooms
pub async fn create_room(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RoomInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(Created(state.rooms.create_room(input).await?))
}

/// PUT /api/rooms/{id}
pub async fn update_room(
    State(state): State<AppState>,
    IdPath(id): IdPath<RoomId>,
    JsonBody(input): JsonBody<RoomInput>,
) -> ApiResult<Json<Room>> {
    Ok(Json(state.rooms.update_room(id, input).await?))
}

/// DELETE /api/rooms/{id}
pub async fn delete_room(
    State(state): State<AppState>,
    IdPath(id): IdPath<RoomId>,
) -> ApiResult<MessageResponse> {
    state.rooms.delete_room(id).await?;
    Ok(MessageResponse::deleted(Room::KIND))
}

/// POST /api/rooms/{id}/assign
///
/// Places a patient in the room or releases it. An unknown room is a 404;
/// an unknown patient is a bad request.
pub async fn assign_room(
    State(state): State<AppState>,
    IdPath(id): IdPath<RoomId>,
    JsonBody(request): JsonBody<AssignRequest>,
) -> ApiResult<Json<Room>> {
    let room = state
        .rooms
        .assign(id, request.patient_id)
        .await
        .map_err(|e| {
            if matches!(e, CoreError::NotFound { entity, .. } if entity == Patient::KIND) {
                ApiError::bad_request(e.to_string())
            } else {
                ApiError::from(e)
            }
        })?;
    Ok(Json(room))
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Doctor handlers.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde::Deserialize;

use clinic_core::{CoreError, Doctor, DoctorId, DoctorInput, Entity};

use crate::error::ApiResult;
use crate::extractors::{IdPath, JsonBody, QueryParams};
use crate::response::{Created, MessageResponse};
use crate::state::AppState;

/// Query filters for listing doctors.
#[derive(Debug, Default, Deserialize)]
pub struct DoctorFilter {
    /// Exact specialization.
    pub specialization: Option<String>,
}

/// GET /api/doctors
///
/// Newest first.
pub async fn list_doctors(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<DoctorFilter>,
) -> ApiResult<Json<Vec<Doctor>>> {
    let mut doctors = state
        .store
        .doctors
        .list(&|d: &Doctor| super::matches(&filter.specialization, &d.specialization))
        .await?;
    doctors.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Ok(Json(doctors))
}

/// GET /api/doctors/{id}
pub async fn get_doctor(
    State(state): State<AppState>,
    IdPath(id): IdPath<DoctorId>,
) -> ApiResult<Json<Doctor>> {
    Ok(Json(state.store.doctors.require(id).await?))
}

/// POST /api/doctors
pub async fn create_doctor(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<DoctorInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;
    let doctor = state
        .store
        .doctors
        .insert(Doctor::from_input(input, Utc::now()))
        .await?;

    tracing::info!(doctor_id = %doctor.id, "Doctor created");
    Ok(Created(doctor))
}

/// PUT /api/doctors/{id}
pub async fn update_doctor(
    State(state): State<AppState>,
    IdPath(id): IdPath<DoctorId>,
    JsonBody(input): JsonBody<DoctorInput>,
) -> ApiResult<Json<Doctor>> {
    let mut doctor = state.store.doctors.require(id).await?;
    input.validate()?;
    doctor.apply(input, Utc::now());
    Ok(Json(state.store.doctors.update(doctor).await?))
}

/// DELETE /api/doctors/{id}
pub async fn delete_doctor(
    State(state): State<AppState>,
    IdPath(id): IdPath<DoctorId>,
) -> ApiResult<MessageResponse> {
    if !state.store.doctors.delete(id).await? {
        return Err(CoreError::not_found(Doctor::KIND, id).into());
    }

    tracing::info!(doctor_id = %id, "Doctor deleted");
    Ok(MessageResponse::deleted(Doctor::KIND))
}

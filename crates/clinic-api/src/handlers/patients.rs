// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Patient handlers.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;

use clinic_core::{Patient, PatientId, PatientInput};

use crate::error::ApiResult;
use crate::extractors::{IdPath, JsonBody};
use crate::response::{Created, MessageResponse};
use crate::state::AppState;

/// GET /api/patients
///
/// Ordered by id.
pub async fn list_patients(State(state): State<AppState>) -> ApiResult<Json<Vec<Patient>>> {
    Ok(Json(state.store.patients.list_all().await?))
}

/// GET /api/patients/{id}
pub async fn get_patient(
    State(state): State<AppState>,
    IdPath(id): IdPath<PatientId>,
) -> ApiResult<Json<Patient>> {
    Ok(Json(state.store.patients.require(id).await?))
}

/// POST /api/patients
pub async fn create_patient(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<PatientInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;
    let patient = state
        .store
        .patients
        .insert(Patient::from_input(input, Utc::now()))
        .await?;

    tracing::info!(patient_id = %patient.id, "Patient created");
    Ok(Created(patient))
}

/// PUT /api/patients/{id}
pub async fn update_patient(
    State(state): State<AppState>,
    IdPath(id): IdPath<PatientId>,
    JsonBody(input): JsonBody<PatientInput>,
) -> ApiResult<Json<Patient>> {
    let mut patient = state.store.patients.require(id).await?;
    input.validate()?;
    patient.apply(input);
    Ok(Json(state.store.patients.update(patient).await?))
}

/// DELETE /api/patients/{id}
///
/// Refused while the patient occupies a room.
pub async fn delete_patient(
    State(state): State<AppState>,
    IdPath(id): IdPath<PatientId>,
) -> ApiResult<MessageResponse> {
    state.rooms.delete_patient(id).await?;
    Ok(MessageResponse::deleted("Patient"))
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Prescription handlers.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;

use clinic_core::{CoreError, Entity, Prescription, PrescriptionId, PrescriptionInput};

use super::ensure_referenced;
use super::medical_records::ClinicalFilter;
use crate::error::ApiResult;
use crate::extractors::{IdPath, JsonBody, QueryParams};
use crate::response::{Created, MessageResponse};
use crate::state::AppState;

/// GET /api/prescriptions
///
/// Latest date first.
pub async fn list_prescriptions(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<ClinicalFilter>,
) -> ApiResult<Json<Vec<Prescription>>> {
    let mut prescriptions = state
        .store
        .prescriptions
        .list(&|p: &Prescription| filter.accepts(p.patient_id, p.doctor_id))
        .await?;
    prescriptions.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(Json(prescriptions))
}

/// GET /api/prescriptions/{id}
pub async fn get_prescription(
    State(state): State<AppState>,
    IdPath(id): IdPath<PrescriptionId>,
) -> ApiResult<Json<Prescription>> {
    Ok(Json(state.store.prescriptions.require(id).await?))
}

/// POST /api/prescriptions
pub async fn create_prescription(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<PrescriptionInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;
    ensure_referenced(state.store.patients.as_ref(), input.patient_id).await?;
    ensure_referenced(state.store.doctors.as_ref(), input.doctor_id).await?;

    let prescription = state
        .store
        .prescriptions
        .insert(Prescription::from_input(input, Utc::now()))
        .await?;

    tracing::info!(prescription_id = %prescription.id, "Prescription created");
    Ok(Created(prescription))
}

/// PUT /api/prescriptions/{id}
pub async fn update_prescription(
    State(state): State<AppState>,
    IdPath(id): IdPath<PrescriptionId>,
    JsonBody(input): JsonBody<PrescriptionInput>,
) -> ApiResult<Json<Prescription>> {
    let mut prescription = state.store.prescriptions.require(id).await?;
    input.validate()?;
    ensure_referenced(state.store.patients.as_ref(), input.patient_id).await?;
    ensure_referenced(state.store.doctors.as_ref(), input.doctor_id).await?;

    prescription.apply(input, Utc::now());
    Ok(Json(state.store.prescriptions.update(prescription).await?))
}

/// DELETE /api/prescriptions/{id}
pub async fn delete_prescription(
    State(state): State<AppState>,
    IdPath(id): IdPath<PrescriptionId>,
) -> ApiResult<MessageResponse> {
    if !state.store.prescriptions.delete(id).await? {
        return Err(CoreError::not_found(Prescription::KIND, id).into());
    }
    Ok(MessageResponse::deleted(Prescription::KIND))
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Medical record handlers.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde::Deserialize;

use clinic_core::{
    CoreError, DoctorId, Entity, MedicalRecord, MedicalRecordId, MedicalRecordInput, PatientId,
};

use super::{ensure_referenced, matches};
use crate::error::ApiResult;
use crate::extractors::{IdPath, JsonBody, QueryParams};
use crate::response::{Created, MessageResponse};
use crate::state::AppState;

/// Query filters shared by medical records and prescriptions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalFilter {
    /// Only this patient's entries.
    pub patient_id: Option<PatientId>,
    /// Only this doctor's entries.
    pub doctor_id: Option<DoctorId>,
}

impl ClinicalFilter {
    pub(crate) fn accepts(&self, patient: PatientId, doctor: DoctorId) -> bool {
        matches(&self.patient_id, &patient) && matches(&self.doctor_id, &doctor)
    }
}

/// GET /api/medical-records
///
/// Latest date first.
pub async fn list_medical_records(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<ClinicalFilter>,
) -> ApiResult<Json<Vec<MedicalRecord>>> {
    let mut records = state
        .store
        .medical_records
        .list(&|r: &MedicalRecord| filter.accepts(r.patient_id, r.doctor_id))
        .await?;
    records.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(Json(records))
}

/// GET /api/medical-records/{id}
pub async fn get_medical_record(
    State(state): State<AppState>,
    IdPath(id): IdPath<MedicalRecordId>,
) -> ApiResult<Json<MedicalRecord>> {
    Ok(Json(state.store.medical_records.require(id).await?))
}

/// POST /api/medical-records
///
/// Both the patient and the doctor must exist.
pub async fn create_medical_record(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<MedicalRecordInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;
    ensure_referenced(state.store.patients.as_ref(), input.patient_id).await?;
    ensure_referenced(state.store.doctors.as_ref(), input.doctor_id).await?;

    let record = state
        .store
        .medical_records
        .insert(MedicalRecord::from_input(input, Utc::now()))
        .await?;

    tracing::info!(record_id = %record.id, patient_id = %record.patient_id, "Medical record created");
    Ok(Created(record))
}

/// PUT /api/medical-records/{id}
pub async fn update_medical_record(
    State(state): State<AppState>,
    IdPath(id): IdPath<MedicalRecordId>,
    JsonBody(input): JsonBody<MedicalRecordInput>,
) -> ApiResult<Json<MedicalRecord>> {
    let mut record = state.store.medical_records.require(id).await?;
    input.validate()?;
    ensure_referenced(state.store.patients.as_ref(), input.patient_id).await?;
    ensure_referenced(state.store.doctors.as_ref(), input.doctor_id).await?;

    record.apply(input, Utc::now());
    Ok(Json(state.store.medical_records.update(record).await?))
}

/// DELETE /api/medical-records/{id}
pub async fn delete_medical_record(
    State(state): State<AppState>,
    IdPath(id): IdPath<MedicalRecordId>,
) -> ApiResult<MessageResponse> {
    if !state.store.medical_records.delete(id).await? {
        return Err(CoreError::not_found(MedicalRecord::KIND, id).into());
    }
    Ok(MessageResponse::deleted(MedicalRecord::KIND))
}

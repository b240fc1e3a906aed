// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Appointment handlers.
//!
//! Listing is the one read with a data filter on top of the permission
//! check: a doctor only ever sees their own appointments, whatever the
//! query string asks for.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde::Deserialize;

use clinic_core::{
    Appointment, AppointmentId, AppointmentInput, AppointmentStatus, CoreError, DoctorId, Entity,
    PatientId,
};

use super::{ensure_referenced, matches};
use crate::error::ApiResult;
use crate::extractors::{Auth, IdPath, JsonBody, QueryParams};
use crate::response::{Created, MessageResponse};
use crate::state::AppState;

/// Query filters for listing appointments.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentFilter {
    /// Only this patient's appointments.
    pub patient_id: Option<PatientId>,
    /// Only this doctor's appointments.
    pub doctor_id: Option<DoctorId>,
    /// Only appointments in this status.
    pub status: Option<AppointmentStatus>,
}

impl AppointmentFilter {
    fn accepts(&self, scope: Option<DoctorId>, appointment: &Appointment) -> bool {
        matches(&scope, &appointment.doctor_id)
            && matches(&self.patient_id, &appointment.patient_id)
            && matches(&self.doctor_id, &appointment.doctor_id)
            && matches(&self.status, &appointment.status)
    }
}

/// GET /api/appointments
///
/// Latest date first.
pub async fn list_appointments(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    QueryParams(filter): QueryParams<AppointmentFilter>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let scope = ctx.doctor_scope();
    let mut appointments = state
        .store
        .appointments
        .list(&|a: &Appointment| filter.accepts(scope, a))
        .await?;
    appointments.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(Json(appointments))
}

/// GET /api/appointments/{id}
pub async fn get_appointment(
    State(state): State<AppState>,
    IdPath(id): IdPath<AppointmentId>,
) -> ApiResult<Json<Appointment>> {
    Ok(Json(state.store.appointments.require(id).await?))
}

/// POST /api/appointments
///
/// The patient must exist.
pub async fn create_appointment(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<AppointmentInput>,
) -> ApiResult<impl IntoResponse> {
    ensure_referenced(state.store.patients.as_ref(), input.patient_id).await?;

    let appointment = state
        .store
        .appointments
        .insert(Appointment::from_input(input, Utc::now()))
        .await?;

    tracing::info!(
        appointment_id = %appointment.id,
        doctor_id = %appointment.doctor_id,
        "Appointment created"
    );
    Ok(Created(appointment))
}

/// PUT /api/appointments/{id}
pub async fn update_appointment(
    State(state): State<AppState>,
    IdPath(id): IdPath<AppointmentId>,
    JsonBody(input): JsonBody<AppointmentInput>,
) -> ApiResult<Json<Appointment>> {
    let mut appointment = state.store.appointments.require(id).await?;
    ensure_referenced(state.store.patients.as_ref(), input.patient_id).await?;

    appointment.apply(input, Utc::now());
    Ok(Json(state.store.appointments.update(appointment).await?))
}

/// DELETE /api/appointments/{id}
pub async fn delete_appointment(
    State(state): State<AppState>,
    IdPath(id): IdPath<AppointmentId>,
) -> ApiResult<MessageResponse> {
    if !state.store.appointments.delete(id).await? {
        return Err(CoreError::not_found(Appointment::KIND, id).into());
    }
    Ok(MessageResponse::deleted(Appointment::KIND))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(patient: u64, doctor: u64, status: AppointmentStatus) -> Appointment {
        let now = Utc::now();
        Appointment::from_input(
            AppointmentInput {
                patient_id: PatientId::new(patient),
                doctor_id: DoctorId::new(doctor),
                date: now,
                time: "10:00 AM".into(),
                status,
                notes: String::new(),
            },
            now,
        )
    }

    #[test]
    fn test_doctor_scope_overrides_query() {
        let filter = AppointmentFilter {
            doctor_id: Some(DoctorId::new(3)),
            ..Default::default()
        };
        let mine = appointment(1, 7, AppointmentStatus::Scheduled);
        let theirs = appointment(1, 3, AppointmentStatus::Scheduled);

        let scope = Some(DoctorId::new(7));
        assert!(!filter.accepts(scope, &mine));
        assert!(!filter.accepts(scope, &theirs));
        assert!(filter.accepts(None, &theirs));
    }

    #[test]
    fn test_filters_combine() {
        let filter: AppointmentFilter =
            serde_json::from_value(serde_json::json!({ "patientId": 2, "status": "Completed" }))
                .unwrap();

        assert!(filter.accepts(None, &appointment(2, 1, AppointmentStatus::Completed)));
        assert!(!filter.accepts(None, &appointment(2, 1, AppointmentStatus::Scheduled)));
        assert!(!filter.accepts(None, &appointment(4, 1, AppointmentStatus::Completed)));
    }
}

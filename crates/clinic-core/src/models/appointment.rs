// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Entity;
use crate::types::{AppointmentId, AppointmentStatus, DoctorId, PatientId};

/// A booked visit between a patient and a doctor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Appointment id.
    pub id: AppointmentId,
    /// The patient.
    pub patient_id: PatientId,
    /// The doctor.
    pub doctor_id: DoctorId,
    /// Scheduled instant.
    pub date: DateTime<Utc>,
    /// Display time slot, e.g. `"10:00 AM"`.
    pub time: String,
    /// Lifecycle status.
    pub status: AppointmentStatus,
    /// Free-form notes.
    pub notes: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for [`Appointment`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentInput {
    /// The patient.
    pub patient_id: PatientId,
    /// The doctor.
    pub doctor_id: DoctorId,
    /// Scheduled instant.
    pub date: DateTime<Utc>,
    /// Display time slot.
    #[serde(default)]
    pub time: String,
    /// Lifecycle status. Defaults to `Scheduled`.
    #[serde(default)]
    pub status: AppointmentStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

impl Appointment {
    /// Builds a new appointment from a payload.
    pub fn from_input(input: AppointmentInput, now: DateTime<Utc>) -> Self {
        Self {
            id: AppointmentId::new(0),
            patient_id: input.patient_id,
            doctor_id: input.doctor_id,
            date: input.date,
            time: input.time,
            status: input.status,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the mutable fields with the payload.
    pub fn apply(&mut self, input: AppointmentInput, now: DateTime<Utc>) {
        self.patient_id = input.patient_id;
        self.doctor_id = input.doctor_id;
        self.date = input.date;
        self.time = input.time;
        self.status = input.status;
        self.notes = input.notes;
        self.updated_at = now;
    }
}

impl Entity for Appointment {
    type Id = AppointmentId;
    const KIND: &'static str = "Appointment";

    fn id(&self) -> AppointmentId {
        self.id
    }

    fn assign_id(&mut self, id: AppointmentId) {
        self.id = id;
    }
}

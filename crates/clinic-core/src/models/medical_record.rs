// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::CoreResult;
use crate::store::Entity;
use crate::types::{DoctorId, MedicalRecordId, PatientId};

/// A diagnosis entry written by a doctor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    /// Record id.
    pub id: MedicalRecordId,
    /// The patient.
    pub patient_id: PatientId,
    /// The authoring doctor.
    pub doctor_id: DoctorId,
    /// Diagnosis text.
    pub diagnosis: String,
    /// Prescribed treatment, free-form.
    pub prescription: String,
    /// Free-form notes.
    pub notes: String,
    /// Examination date.
    pub date: DateTime<Utc>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for [`MedicalRecord`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordInput {
    /// The patient.
    pub patient_id: PatientId,
    /// The authoring doctor.
    pub doctor_id: DoctorId,
    /// Diagnosis text.
    pub diagnosis: String,
    /// Prescribed treatment.
    #[serde(default)]
    pub prescription: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Examination date. Defaults to the time of the request.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl MedicalRecordInput {
    /// Validates the payload.
    pub fn validate(&self) -> CoreResult<()> {
        require_text("diagnosis", &self.diagnosis)
    }
}

impl MedicalRecord {
    /// Builds a new record from a validated payload.
    pub fn from_input(input: MedicalRecordInput, now: DateTime<Utc>) -> Self {
        Self {
            id: MedicalRecordId::new(0),
            patient_id: input.patient_id,
            doctor_id: input.doctor_id,
            diagnosis: input.diagnosis,
            prescription: input.prescription,
            notes: input.notes,
            date: input.date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the mutable fields with the payload.
    pub fn apply(&mut self, input: MedicalRecordInput, now: DateTime<Utc>) {
        self.patient_id = input.patient_id;
        self.doctor_id = input.doctor_id;
        self.diagnosis = input.diagnosis;
        self.prescription = input.prescription;
        self.notes = input.notes;
        if let Some(date) = input.date {
            self.date = date;
        }
        self.updated_at = now;
    }
}

impl Entity for MedicalRecord {
    type Id = MedicalRecordId;
    const KIND: &'static str = "Medical record";

    fn id(&self) -> MedicalRecordId {
        self.id
    }

    fn assign_id(&mut self, id: MedicalRecordId) {
        self.id = id;
    }
}

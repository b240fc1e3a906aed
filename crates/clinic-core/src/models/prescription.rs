// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::CoreResult;
use crate::store::Entity;
use crate::types::{DoctorId, PatientId, PrescriptionId};

/// A medication order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    /// Prescription id.
    pub id: PrescriptionId,
    /// The patient.
    pub patient_id: PatientId,
    /// The prescribing doctor.
    pub doctor_id: DoctorId,
    /// Medicine name.
    pub medicine_name: String,
    /// Dosage, e.g. `"500mg"`.
    pub dosage: String,
    /// Usage instructions.
    pub instructions: String,
    /// Issue date.
    pub date: DateTime<Utc>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for [`Prescription`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionInput {
    /// The patient.
    pub patient_id: PatientId,
    /// The prescribing doctor.
    pub doctor_id: DoctorId,
    /// Medicine name.
    pub medicine_name: String,
    /// Dosage.
    #[serde(default)]
    pub dosage: String,
    /// Usage instructions.
    #[serde(default)]
    pub instructions: String,
    /// Issue date. Defaults to the time of the request.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl PrescriptionInput {
    /// Validates the payload.
    pub fn validate(&self) -> CoreResult<()> {
        require_text("medicineName", &self.medicine_name)
    }
}

impl Prescription {
    /// Builds a new prescription from a validated payload.
    pub fn from_input(input: PrescriptionInput, now: DateTime<Utc>) -> Self {
        Self {
            id: PrescriptionId::new(0),
            patient_id: input.patient_id,
            doctor_id: input.doctor_id,
            medicine_name: input.medicine_name,
            dosage: input.dosage,
            instructions: input.instructions,
            date: input.date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the mutable fields with the payload.
    pub fn apply(&mut self, input: PrescriptionInput, now: DateTime<Utc>) {
        self.patient_id = input.patient_id;
        self.doctor_id = input.doctor_id;
        self.medicine_name = input.medicine_name;
        self.dosage = input.dosage;
        self.instructions = input.instructions;
        if let Some(date) = input.date {
            self.date = date;
        }
        self.updated_at = now;
    }
}

impl Entity for Prescription {
    type Id = PrescriptionId;
    const KIND: &'static str = "Prescription";

    fn id(&self) -> PrescriptionId {
        self.id
    }

    fn assign_id(&mut self, id: PrescriptionId) {
        self.id = id;
    }
}

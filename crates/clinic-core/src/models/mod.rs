// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Clinical entities and their request payloads.
//!
//! Each entity comes with an `*Input` payload used for both create and
//! update. Inputs are validated before they touch the store; identifiers and
//! timestamps are always owned by the server.

mod appointment;
mod bill;
mod doctor;
mod medical_record;
mod patient;
mod prescription;
mod room;
mod user;

pub use appointment::{Appointment, AppointmentInput};
pub use bill::{Bill, BillInput};
pub use doctor::{Doctor, DoctorInput};
pub use medical_record::{MedicalRecord, MedicalRecordInput};
pub use patient::{Patient, PatientInput};
pub use prescription::{Prescription, PrescriptionInput};
pub use room::{Room, RoomInput};
pub use user::User;

use crate::error::{CoreError, CoreResult};

/// Rejects blank required text fields.
pub(crate) fn require_text(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{field} is required")));
    }
    Ok(())
}

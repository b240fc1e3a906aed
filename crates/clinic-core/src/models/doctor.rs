// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::CoreResult;
use crate::store::Entity;
use crate::types::DoctorId;

/// A physician on staff.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// Doctor id. Shared with the doctor's login account.
    pub id: DoctorId,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Medical specialization.
    pub specialization: String,
    /// Free-form availability, e.g. `"Mon-Fri 9-17"`.
    pub availability: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for [`Doctor`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorInput {
    /// Full name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Medical specialization.
    #[serde(default)]
    pub specialization: String,
    /// Free-form availability.
    #[serde(default)]
    pub availability: String,
}

impl DoctorInput {
    /// Validates the payload.
    pub fn validate(&self) -> CoreResult<()> {
        require_text("name", &self.name)
    }
}

impl Doctor {
    /// Builds a new doctor from a validated payload.
    pub fn from_input(input: DoctorInput, now: DateTime<Utc>) -> Self {
        Self {
            id: DoctorId::new(0),
            name: input.name,
            email: input.email,
            phone: input.phone,
            specialization: input.specialization,
            availability: input.availability,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the mutable fields with the payload.
    pub fn apply(&mut self, input: DoctorInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.email = input.email;
        self.phone = input.phone;
        self.specialization = input.specialization;
        self.availability = input.availability;
        self.updated_at = now;
    }
}

impl Entity for Doctor {
    type Id = DoctorId;
    const KIND: &'static str = "Doctor";

    fn id(&self) -> DoctorId {
        self.id
    }

    fn assign_id(&mut self, id: DoctorId) {
        self.id = id;
    }
}

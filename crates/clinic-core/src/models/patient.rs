// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::CoreResult;
use crate::store::Entity;
use crate::types::PatientId;

/// A registered patient.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Patient id.
    pub id: PatientId,
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Free-form gender.
    pub gender: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Postal address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Create/update payload for [`Patient`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInput {
    /// Full name.
    pub name: String,
    /// Age in years.
    #[serde(default)]
    pub age: u32,
    /// Free-form gender.
    #[serde(default)]
    pub gender: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
}

impl PatientInput {
    /// Validates the payload.
    pub fn validate(&self) -> CoreResult<()> {
        require_text("name", &self.name)
    }
}

impl Patient {
    /// Builds a new patient from a validated payload.
    pub fn from_input(input: PatientInput, now: DateTime<Utc>) -> Self {
        Self {
            id: PatientId::new(0),
            name: input.name,
            age: input.age,
            gender: input.gender,
            phone: input.phone,
            email: input.email,
            address: input.address,
            created_at: now,
        }
    }

    /// Replaces the mutable fields with the payload.
    pub fn apply(&mut self, input: PatientInput) {
        self.name = input.name;
        self.age = input.age;
        self.gender = input.gender;
        self.phone = input.phone;
        self.email = input.email;
        self.address = input.address;
    }
}

impl Entity for Patient {
    type Id = PatientId;
    const KIND: &'static str = "Patient";

    fn id(&self) -> PatientId {
        self.id
    }

    fn assign_id(&mut self, id: PatientId) {
        self.id = id;
    }
}

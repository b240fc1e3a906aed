// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::{CoreError, CoreResult};
use crate::store::Entity;
use crate::types::{PatientId, RoomId, RoomStatus};

/// A bookable room.
///
/// Status and occupant are only writable inside this crate so that every
/// occupancy change goes through the room coordinator. The pair always
/// satisfies `status == Occupied` iff an occupant is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Room id.
    pub id: RoomId,
    /// Human-facing room number, unique.
    pub room_number: String,
    /// Room type, e.g. `"ICU"`.
    #[serde(rename = "type")]
    pub room_type: String,
    status: RoomStatus,
    #[serde(rename = "patientId", skip_serializing_if = "Option::is_none")]
    occupant: Option<PatientId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for [`Room`].
///
/// `Occupied` is not accepted here; occupancy changes only through
/// assignment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInput {
    /// Room number.
    pub room_number: String,
    /// Room type.
    #[serde(rename = "type", default)]
    pub room_type: String,
    /// `Available` or `Maintenance`. Defaults to `Available`.
    #[serde(default)]
    pub status: Option<RoomStatus>,
}

impl RoomInput {
    /// Validates the payload.
    pub fn validate(&self) -> CoreResult<()> {
        require_text("roomNumber", &self.room_number)?;
        if self.status == Some(RoomStatus::Occupied) {
            return Err(CoreError::validation(
                "status Occupied can only be set by assigning a patient",
            ));
        }
        Ok(())
    }

    /// The requested status, defaulting to `Available`.
    pub fn requested_status(&self) -> RoomStatus {
        self.status.unwrap_or(RoomStatus::Available)
    }
}

impl Room {
    /// Builds a new, unoccupied room from a validated payload.
    pub fn from_input(input: RoomInput, now: DateTime<Utc>) -> Self {
        let status = input.requested_status();
        Self {
            id: RoomId::new(0),
            room_number: input.room_number.trim().to_string(),
            room_type: input.room_type,
            status,
            occupant: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Current status.
    pub fn status(&self) -> RoomStatus {
        self.status
    }

    /// Current occupant, if any.
    pub fn occupant(&self) -> Option<PatientId> {
        self.occupant
    }

    /// Returns `true` if the room hosts a patient.
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Applies number, type and (non-occupied) status from the payload.
    pub(crate) fn apply(&mut self, input: RoomInput, now: DateTime<Utc>) {
        let status = input.requested_status();
        self.room_number = input.room_number.trim().to_string();
        self.room_type = input.room_type;
        if !self.is_occupied() {
            self.status = status;
        }
        self.updated_at = now;
    }

    pub(crate) fn occupy(&mut self, patient: PatientId, now: DateTime<Utc>) {
        self.occupant = Some(patient);
        self.status = RoomStatus::Occupied;
        self.updated_at = now;
    }

    /// Clears the occupant and returns the room to service.
    pub(crate) fn release(&mut self, now: DateTime<Utc>) {
        self.occupant = None;
        self.status = RoomStatus::Available;
        self.updated_at = now;
    }
}

impl Entity for Room {
    type Id = RoomId;
    const KIND: &'static str = "Room";

    fn id(&self) -> RoomId {
        self.id
    }

    fn assign_id(&mut self, id: RoomId) {
        self.id = id;
    }
}

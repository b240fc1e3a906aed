// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identifier newtypes and closed enumerations shared across the domain.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw id.
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw id.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// User account id. Also the subject of an issued token.
    UserId
);
entity_id!(
    /// Patient id.
    PatientId
);
entity_id!(
    /// Doctor id.
    DoctorId
);
entity_id!(
    /// Appointment id.
    AppointmentId
);
entity_id!(
    /// Medical record id.
    MedicalRecordId
);
entity_id!(
    /// Prescription id.
    PrescriptionId
);
entity_id!(
    /// Bill id.
    BillId
);
entity_id!(
    /// Room id.
    RoomId
);

// =============================================================================
// Role
// =============================================================================

/// The closed set of account roles.
///
/// Every identity carries exactly one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Clinic administrator.
    Admin,
    /// Physician. Doctor accounts share their id with the doctor record.
    Doctor,
    /// Front desk staff.
    Receptionist,
    /// Patient self-service account.
    Patient,
}

impl Role {
    /// All roles, in table order.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Doctor, Role::Receptionist, Role::Patient];

    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Receptionist => "receptionist",
            Role::Patient => "patient",
        }
    }

    /// Parses a role from a string, ignoring ASCII case.
    pub fn parse(s: &str) -> Option<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Statuses
// =============================================================================

/// Occupancy status of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomStatus {
    /// Free for assignment.
    Available,
    /// Hosting exactly one patient.
    Occupied,
    /// Out of service.
    Maintenance,
}

impl RoomStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "Available",
            RoomStatus::Occupied => "Occupied",
            RoomStatus::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    /// Booked and pending.
    #[default]
    Scheduled,
    /// Took place.
    Completed,
    /// Called off.
    Cancelled,
}

/// Payment status of a bill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillStatus {
    /// Settled.
    Paid,
    /// Outstanding.
    #[default]
    Unpaid,
}

// =============================================================================
// Tests
// =============================================================================

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error hierarchy for the domain layer.
//!
//! ```text
//! CoreError
//! ├── NotFound     - unknown entity id
//! ├── Conflict     - state or uniqueness conflict (see ConflictError)
//! ├── Validation   - malformed input
//! └── Storage      - persistence backend failure
//! ```

use thiserror::Error;

use crate::types::{PatientId, RoomId};

/// Result type alias for domain operations.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// CoreError
// =============================================================================

/// The root error type of the domain layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The referenced entity does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// Entity kind, e.g. `"Patient"`.
        entity: &'static str,
        /// The id that was looked up.
        id: u64,
    },

    /// The operation conflicts with current state.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// The input failed validation.
    #[error("{message}")]
    Validation {
        /// Human-readable reason.
        message: String,
    },

    /// The persistence backend failed.
    #[error("storage failure: {message}")]
    Storage {
        /// Backend-specific detail. Not shown to clients.
        message: String,
    },
}

impl CoreError {
    /// Creates a not found error.
    pub fn not_found(entity: &'static str, id: impl Into<u64>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }

    /// Returns `true` if this is a conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, CoreError::Conflict(_))
    }

    /// Returns the conflict, if this is one.
    pub fn as_conflict(&self) -> Option<&ConflictError> {
        match self {
            CoreError::Conflict(conflict) => Some(conflict),
            _ => None,
        }
    }
}

// =============================================================================
// ConflictError
// =============================================================================

/// State and uniqueness conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    /// The room already hosts a different patient.
    #[error("Room is already occupied")]
    RoomOccupied {
        /// The room that was requested.
        room: RoomId,
        /// Its current occupant.
        occupant: PatientId,
    },

    /// The patient already occupies another room.
    #[error("Patient is already assigned to room {room}")]
    PatientAlreadyAssigned {
        /// The patient that was requested.
        patient: PatientId,
        /// The room the patient currently occupies.
        room: RoomId,
    },

    /// The patient cannot be deleted while occupying a room.
    #[error("Patient occupies room {room} and cannot be deleted")]
    PatientInRoom {
        /// The patient being deleted.
        patient: PatientId,
        /// The room still referencing the patient.
        room: RoomId,
    },

    /// The room status cannot change while a patient occupies it.
    #[error("Room {room} is occupied; release it before changing its status")]
    RoomInUse {
        /// The occupied room.
        room: RoomId,
    },

    /// Another room already uses this number.
    #[error("Room number already exists")]
    DuplicateRoomNumber {
        /// The clashing room number.
        room_number: String,
    },

    /// Another account already uses this email.
    #[error("Email already registered")]
    DuplicateEmail,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = CoreError::not_found("Room", 12u64);
        assert_eq!(err.to_string(), "Room not found");
        assert!(err.is_not_found());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_conflict_is_transparent() {
        let err: CoreError = ConflictError::RoomOccupied {
            room: RoomId::new(12),
            occupant: PatientId::new(5),
        }
        .into();

        assert_eq!(err.to_string(), "Room is already occupied");
        assert!(matches!(
            err.as_conflict(),
            Some(ConflictError::RoomOccupied { .. })
        ));
    }
}

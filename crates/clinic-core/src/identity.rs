// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Verified caller identity.

use serde::Serialize;

use crate::types::{DoctorId, Role, UserId};

/// The identity of an authenticated caller.
///
/// Produced by credential verification, lives for one request and is never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Subject id (the user account id).
    pub subject: UserId,
    /// The caller's single role.
    pub role: Role,
}

impl Identity {
    /// Creates a new identity.
    pub fn new(subject: impl Into<UserId>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }

    /// The doctor record this identity acts as, if it is a doctor.
    ///
    /// Doctor accounts and doctor records share ids.
    pub fn as_doctor(&self) -> Option<DoctorId> {
        match self.role {
            Role::Doctor => Some(DoctorId::new(self.subject.get())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_doctor() {
        let doctor = Identity::new(7u64, Role::Doctor);
        assert_eq!(doctor.as_doctor(), Some(DoctorId::new(7)));

        let admin = Identity::new(7u64, Role::Admin);
        assert_eq!(admin.as_doctor(), None);
    }
}

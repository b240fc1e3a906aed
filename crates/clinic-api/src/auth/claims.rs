// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinic_core::{Identity, Role, UserId};

/// Claims carried by an issued token: `{id, role, exp, iat}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject id.
    pub id: u64,
    /// Role name.
    pub role: Role,
    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,
    /// Issued at time (Unix timestamp, seconds).
    pub iat: i64,
}

impl Claims {
    /// Creates claims for `identity`, issued at `now`.
    pub fn new(identity: &Identity, now: i64, expires_in_secs: i64) -> Self {
        Self {
            id: identity.subject.get(),
            role: identity.role,
            exp: now + expires_in_secs,
            iat: now,
        }
    }

    /// The identity these claims describe.
    pub fn identity(&self) -> Identity {
        Identity::new(UserId::new(self.id), self.role)
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let identity = Identity::new(7u64, Role::Doctor);
        let claims = Claims::new(&identity, 1_000, 86_400);

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 7, "role": "doctor", "exp": 87_400, "iat": 1_000 })
        );
        assert_eq!(claims.identity(), identity);
    }
}

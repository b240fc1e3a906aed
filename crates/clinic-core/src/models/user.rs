// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::Entity;
use crate::types::{Role, UserId};

/// A login account.
///
/// The password hash never leaves the process.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Account id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, unique across accounts.
    pub email: String,
    /// PHC-formatted password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// The account's role.
    pub role: Role,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates an account record. The id is assigned on insert.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(0),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            created_at: now,
        }
    }

    /// Returns `true` if `email` matches this account, ignoring ASCII case.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

impl Entity for User {
    type Id = UserId;
    const KIND: &'static str = "User";

    fn id(&self) -> UserId {
        self.id
    }

    fn assign_id(&mut self, id: UserId) {
        self.id = id;
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication context.

use serde::Serialize;
use uuid::Uuid;

use clinic_core::{DoctorId, Identity};

/// Authentication context for a request.
///
/// Attached to the request extensions by the auth middleware after the
/// token has been verified. Lives for a single request.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AuthContext {
    /// The verified caller.
    pub identity: Identity,
    /// Request ID for tracing.
    pub request_id: Uuid,
}

impl AuthContext {
    /// Creates a context for a verified identity with a fresh request id.
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            request_id: Uuid::now_v7(),
        }
    }

    /// The doctor record the caller acts as, if the caller is a doctor.
    pub fn doctor_scope(&self) -> Option<DoctorId> {
        self.identity.as_doctor()
    }
}

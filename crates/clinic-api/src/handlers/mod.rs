// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`health`]: liveness
//! - [`fallback`]: unknown routes and middleware failures
//! - [`auth`]: registration and login
//! - [`dashboard`]: role-scoped dashboards
//! - [`doctors`], [`patients`], [`appointments`], [`medical_records`],
//!   [`prescriptions`], [`bills`]: CRUD
//! - [`rooms`]: CRUD plus occupancy assignment
//!
//! Handlers assume the access guard already ran: a handler only executes
//! once the caller's role is allowed by the permission matrix.

pub mod appointments;
pub mod auth;
pub mod bills;
pub mod dashboard;
pub mod doctors;
pub mod fallback;
pub mod health;
pub mod medical_records;
pub mod patients;
pub mod prescriptions;
pub mod rooms;

pub use appointments::*;
pub use auth::*;
pub use bills::*;
pub use dashboard::*;
pub use doctors::*;
pub use fallback::*;
pub use health::*;
pub use medical_records::*;
pub use patients::*;
pub use prescriptions::*;
pub use rooms::*;

use clinic_core::{Collection, Entity};

use crate::error::{ApiError, ApiResult};

/// Checks that an entity referenced by a request body exists.
///
/// A dangling reference is a bad request, not a 404: the URL itself was fine.
pub(crate) async fn ensure_referenced<E: Entity>(
    collection: &dyn Collection<E>,
    id: E::Id,
) -> ApiResult<()> {
    match collection.get(id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::bad_request(format!("{} not found", E::KIND))),
    }
}

/// Matches an optional list filter: `None` matches everything.
pub(crate) fn matches<T: PartialEq>(filter: &Option<T>, value: &T) -> bool {
    filter.as_ref().map_or(true, |wanted| wanted == value)
}

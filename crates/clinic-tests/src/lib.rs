// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Clinic Integration Tests
//!
//! Test utilities and cross-crate integration tests for the clinic backend.
//! Every suite drives the real router in-process with
//! `tower::ServiceExt::oneshot`; no socket is bound.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Seed data and token minting
//!   - `assertions`: Response assertion helpers
//!   - `harness`: [`TestApp`](common::TestApp), the in-process server
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p clinic-tests
//! cargo test -p clinic-tests --test integration_rooms
//! ```
//!
//! ## Test Suites
//!
//! - `integration_auth.rs`: registration, login, token verification
//! - `integration_rbac.rs`: permission matrix enforcement over HTTP
//! - `integration_rooms.rs`: room assignment, including concurrent assigns
//! - `integration_dashboard.rs`: role dashboards and doctor scoping
//! - `integration_crud.rs`: entity handlers, 404/400 shapes
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use clinic_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::new();
//!     let patient = app.seed_patient("Ada").await;
//!     let response = app.get(&format!("/api/patients/{}", patient.id), &app.admin_token()).await;
//!     response.assert_status(StatusCode::OK);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::init_test_logging;

    pub use axum::http::{Method, StatusCode};
    pub use serde_json::{json, Value};
}

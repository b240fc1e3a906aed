// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! Together the two layers form the access guard:
//!
//! - [`AuthLayer`]: verifies the bearer token and attaches the identity
//! - [`RbacLayer`]: consults the permission matrix for one route

mod auth;
mod rbac;

pub use auth::{extract_bearer_token, AuthLayer, AuthMiddleware};
pub use rbac::{RbacLayer, RbacMiddleware};

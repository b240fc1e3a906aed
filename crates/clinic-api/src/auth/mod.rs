// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization module.
//!
//! This module provides:
//! - Bearer token issuance and verification
//! - The permission matrix (role x resource x action)
//! - The per-request authentication context

mod claims;
mod context;
mod jwt;
pub mod permission;
mod rbac;

pub use claims::Claims;
pub use context::AuthContext;
pub use jwt::{JwtConfig, JwtManager};
pub use permission::{ActionKind, ResourceKind, RoleSet};
pub use rbac::{Decision, RbacPolicy};

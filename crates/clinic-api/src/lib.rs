// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # clinic-api
//!
//! REST API server for the clinic backend.
//!
//! This crate provides the HTTP surface on axum:
//!
//! - Bearer token verification ([`JwtManager`])
//! - The static permission matrix ([`RbacPolicy`])
//! - The access guard, as tower layers ([`AuthLayer`], [`RbacLayer`])
//! - Handlers for accounts, clinical resources, rooms and dashboards
//!
//! ## Request pipeline
//!
//! ```text
//! request -> TraceLayer -> Timeout -> Cors -> AuthLayer -> RbacLayer -> handler
//!                                               │             │
//!                                        verify token    authorize(role,
//!                                        attach identity  resource, action)
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod password;
pub mod response;
pub mod server;
pub mod state;

pub use auth::{
    ActionKind, AuthContext, Claims, Decision, JwtConfig, JwtManager, RbacPolicy, ResourceKind,
    RoleSet,
};
pub use config::{ApiConfig, CorsConfig};
pub use error::{ApiError, ApiResult, AuthError};
pub use middleware::{AuthLayer, RbacLayer};
pub use server::ApiServer;
pub use state::{AppState, AppStateBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Account handlers: registration and login.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde::Deserialize;

use clinic_core::{ConflictError, CoreError, Identity, Role, User};

use crate::error::{ApiError, ApiResult};
use crate::extractors::JsonBody;
use crate::password::{hash_password, verify_password_or_dummy};
use crate::response::{Created, MessageResponse, TokenResponse};
use crate::state::AppState;

/// The only login failure message. Unknown email and wrong password look alike.
const LOGIN_FAILED: &str = "Invalid email or password";

// =============================================================================
// Register
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
    /// Role name: admin, doctor, receptionist or patient.
    #[serde(default)]
    pub role: String,
}

impl RegisterRequest {
    fn validate(&self) -> ApiResult<Role> {
        if self.email.trim().is_empty() {
            return Err(ApiError::validation("email is required"));
        }
        if self.password.is_empty() {
            return Err(ApiError::validation("password is required"));
        }
        Role::parse(&self.role).ok_or_else(|| ApiError::validation("Invalid role"))
    }
}

/// POST /register
///
/// Creates an account. Emails are unique, ignoring case.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let role = request.validate()?;
    let email = request.email.trim().to_string();
    let password_hash = hash_password(&request.password)?;

    let user = User::new(request.name.trim(), email.as_str(), password_hash, role, Utc::now());
    let inserted = state
        .store
        .users
        .insert_unique(user, &|existing: &User| existing.has_email(&email))
        .await?;

    let Some(user) = inserted else {
        return Err(CoreError::from(ConflictError::DuplicateEmail).into());
    };

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");

    Ok(Created(MessageResponse::new("User registered")))
}

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

/// POST /login
///
/// Verifies credentials and returns a signed bearer token.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = request.email.trim();
    let mut matches = state
        .store
        .users
        .list(&|user: &User| user.has_email(email))
        .await?;

    let user = matches.pop();
    let stored_hash = user.as_ref().map(|user| user.password_hash.as_str());
    let verified = verify_password_or_dummy(&request.password, stored_hash);

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::debug!("Login rejected");
            return Err(ApiError::unauthorized(LOGIN_FAILED));
        }
    };

    let token = state.jwt().issue(&Identity::new(user.id, user.role))?;

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(Json(TokenResponse { token }))
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Dashboard handlers.
//!
//! Each route is guarded for exactly one role, so the role passed to the
//! read model is the route's, not a value taken from the caller.

use axum::{extract::State, Json};

use clinic_core::{DashboardView, Role};

use crate::error::ApiResult;
use crate::extractors::Auth;
use crate::state::AppState;

/// GET /api/dashboard/admin
pub async fn admin_dashboard(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<DashboardView>> {
    Ok(Json(state.read_model.build(Role::Admin, &ctx.identity).await?))
}

/// GET /api/dashboard/doctor
///
/// Scoped to the calling doctor.
pub async fn doctor_dashboard(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<DashboardView>> {
    Ok(Json(state.read_model.build(Role::Doctor, &ctx.identity).await?))
}

/// GET /api/dashboard/receptionist
pub async fn receptionist_dashboard(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<DashboardView>> {
    Ok(Json(
        state
            .read_model
            .build(Role::Receptionist, &ctx.identity)
            .await?,
    ))
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bill handlers.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde::Deserialize;

use clinic_core::{Bill, BillId, BillInput, BillStatus, CoreError, Entity, PatientId};

use super::{ensure_referenced, matches};
use crate::error::ApiResult;
use crate::extractors::{IdPath, JsonBody, QueryParams};
use crate::response::{Created, MessageResponse};
use crate::state::AppState;

/// Query filters for listing bills.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillFilter {
    /// Only this patient's bills.
    pub patient_id: Option<PatientId>,
    /// Only bills in this status.
    pub status: Option<BillStatus>,
}

/// GET /api/bills
///
/// Newest first.
pub async fn list_bills(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<BillFilter>,
) -> ApiResult<Json<Vec<Bill>>> {
    let mut bills = state
        .store
        .bills
        .list(&|b: &Bill| {
            matches(&filter.patient_id, &b.patient_id) && matches(&filter.status, &b.status)
        })
        .await?;
    bills.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Ok(Json(bills))
}

/// GET /api/bills/{id}
pub async fn get_bill(
    State(state): State<AppState>,
    IdPath(id): IdPath<BillId>,
) -> ApiResult<Json<Bill>> {
    Ok(Json(state.store.bills.require(id).await?))
}

/// POST /api/bills
///
/// A bill created as `Paid` without a payment date is stamped with now.
pub async fn create_bill(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<BillInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;
    ensure_referenced(state.store.patients.as_ref(), input.patient_id).await?;

    let bill = state
        .store
        .bills
        .insert(Bill::from_input(input, Utc::now()))
        .await?;

    tracing::info!(bill_id = %bill.id, patient_id = %bill.patient_id, "Bill created");
    Ok(Created(bill))
}

/// PUT /api/bills/{id}
pub async fn update_bill(
    State(state): State<AppState>,
    IdPath(id): IdPath<BillId>,
    JsonBody(input): JsonBody<BillInput>,
) -> ApiResult<Json<Bill>> {
    let mut bill = state.store.bills.require(id).await?;
    input.validate()?;
    ensure_referenced(state.store.patients.as_ref(), input.patient_id).await?;

    bill.apply(input, Utc::now());
    Ok(Json(state.store.bills.update(bill).await?))
}

/// DELETE /api/bills/{id}
pub async fn delete_bill(
    State(state): State<AppState>,
    IdPath(id): IdPath<BillId>,
) -> ApiResult<MessageResponse> {
    if !state.store.bills.delete(id).await? {
        return Err(CoreError::not_found(Bill::KIND, id).into());
    }
    Ok(MessageResponse::deleted(Bill::KIND))
}

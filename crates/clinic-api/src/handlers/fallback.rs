// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Responses for requests no route handles, and for middleware failures.
//!
//! Keeps the `{"error": ...}` body on every path out of the router.

use tower::{timeout::error::Elapsed, BoxError};

use crate::error::ApiError;

/// Unknown path.
pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

/// Known path, unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::bad_request("Method not allowed")
}

/// Converts an error raised by the outer middleware stack.
pub async fn middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::internal(format!("Unhandled middleware error: {}", err))
    }
}

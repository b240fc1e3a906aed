// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API error types and handling.
//!
//! Every failure leaves the server as `{"error": "<message>"}` with one of
//! the statuses 400, 401, 403, 404 or 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use clinic_core::CoreError;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// AuthError
// =============================================================================

/// Credential verification failures. All of them answer 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No bearer token on the request.
    #[error("Missing token")]
    MissingToken,

    /// Bad signature or structurally malformed token.
    #[error("Invalid token")]
    InvalidToken,

    /// The expiry claim is at or before the current time.
    #[error("Token expired")]
    TokenExpired,

    /// Subject, role or expiry claim missing or not understood.
    #[error("Invalid token claims")]
    MalformedClaims,
}

// =============================================================================
// ApiError
// =============================================================================

/// API error type with HTTP status code mapping.
///
/// Returned from handlers and middleware and converted into a response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credential verification failed (401).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Authentication failed for another reason, e.g. bad login (401).
    #[error("{message}")]
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// Valid identity, disallowed action (403).
    #[error("{message}")]
    Forbidden {
        /// Error message.
        message: String,
    },

    /// Unknown entity (404).
    #[error("{message}")]
    NotFound {
        /// Error message, e.g. `"Room not found"`.
        message: String,
    },

    /// Malformed request: bad JSON, bad id, bad query (400).
    #[error("{message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Request body failed domain validation (400).
    #[error("{message}")]
    Validation {
        /// Error message.
        message: String,
    },

    /// State or uniqueness conflict (400).
    #[error("{message}")]
    Conflict {
        /// Error message.
        message: String,
    },

    /// The request outlived the configured timeout (500).
    #[error("Request timed out")]
    Timeout,

    /// Internal server error (500).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message (for logging, not user-facing).
        message: String,
    },
}

impl ApiError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(_) | ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. }
            | ApiError::Validation { .. }
            | ApiError::Conflict { .. } => StatusCode::BAD_REQUEST,
            ApiError::Timeout | ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message shown to clients.
    ///
    /// Internal details never leave the process.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Internal { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Returns `true` if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::Timeout | ApiError::Internal { .. })
    }
}

// =============================================================================
// IntoResponse Implementation
// =============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_server_error() {
            tracing::error!(error = %self, status = %status, "Server error occurred");
        } else {
            tracing::debug!(error = %self, status = %status, "Client error occurred");
        }

        let body = ErrorBody {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Error Response Body
// =============================================================================

/// Error response body: `{"error": "<message>"}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

// =============================================================================
// From Implementations
// =============================================================================

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { .. } => ApiError::not_found(err.to_string()),
            CoreError::Conflict(conflict) => ApiError::conflict(conflict.to_string()),
            CoreError::Validation { message } => ApiError::validation(message),
            CoreError::Storage { message } => ApiError::internal(message),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::bad_request(format!("Invalid JSON: {}", err))
    }
}

// =============================================================================
// Tests
// =============================================================================

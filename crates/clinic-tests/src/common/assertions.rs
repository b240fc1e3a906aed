// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Response Assertions

use axum::http::StatusCode;
use serde_json::Value;

/// A buffered response.
#[derive(Debug, Clone)]
pub struct TestResponse {
    /// Status code.
    pub status: StatusCode,
    /// Body parsed as JSON, or `Null` when empty or not JSON.
    pub body: Value,
}

impl TestResponse {
    /// Assert the status code.
    #[track_caller]
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {} with body {}",
            expected, self.status, self.body
        );
        self
    }

    /// Assert an error response with the given status and message.
    #[track_caller]
    pub fn assert_error(&self, status: StatusCode, message: &str) -> &Self {
        self.assert_status(status);
        assert_eq!(
            self.body,
            serde_json::json!({ "error": message }),
            "Unexpected error body"
        );
        self
    }

    /// The `"error"` message, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }

    /// The `"id"` field as a number.
    #[track_caller]
    pub fn id(&self) -> u64 {
        self.body["id"]
            .as_u64()
            .unwrap_or_else(|| panic!("Response has no numeric id: {}", self.body))
    }

    /// The body as an array.
    #[track_caller]
    pub fn items(&self) -> &Vec<Value> {
        self.body
            .as_array()
            .unwrap_or_else(|| panic!("Expected a JSON array, got {}", self.body))
    }
}

/// Extracts the numeric `field` of every item.
pub fn field_values(items: &[Value], field: &str) -> Vec<u64> {
    items.iter().filter_map(|item| item[field].as_u64()).collect()
}

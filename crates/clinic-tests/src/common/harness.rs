// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! [`TestApp`] wraps the fully assembled router (authentication, access
//! guard, handlers) over a fresh in-memory store.

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use clinic_api::{ApiConfig, ApiServer, AppState, JwtConfig};
use clinic_core::{Identity, Role};

use crate::common::{assertions::TestResponse, fixtures::TEST_SECRET, init_test_logging};

/// The application under test.
pub struct TestApp {
    /// Shared state, for seeding and inspecting storage directly.
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// Builds an application over an empty store.
    pub fn new() -> Self {
        init_test_logging();

        let config = ApiConfig::default().with_jwt(JwtConfig::new(TEST_SECRET));
        let state = AppState::builder().config(config).build().unwrap();
        let router = ApiServer::new(state.clone()).router();

        Self { state, router }
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Mints a token for `subject` with `role`.
    pub fn token(&self, subject: u64, role: Role) -> String {
        self.state.jwt().issue(&Identity::new(subject, role)).unwrap()
    }

    /// Mints a token issued at `issued_at` (Unix seconds).
    pub fn token_issued_at(&self, subject: u64, role: Role, issued_at: i64) -> String {
        self.state
            .jwt()
            .issue_at(&Identity::new(subject, role), issued_at)
            .unwrap()
    }

    /// An administrator token.
    pub fn admin_token(&self) -> String {
        self.token(1, Role::Admin)
    }

    /// A receptionist token.
    pub fn receptionist_token(&self) -> String {
        self.token(2, Role::Receptionist)
    }

    /// A token for the doctor with id `doctor`.
    pub fn doctor_token(&self, doctor: u64) -> String {
        self.token(doctor, Role::Doctor)
    }

    /// A patient-role token.
    pub fn patient_token(&self) -> String {
        self.token(4, Role::Patient)
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Sends a request through the router and buffers the response.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Authenticated GET.
    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    /// Authenticated POST with a JSON body.
    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    /// Authenticated PUT with a JSON body.
    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    /// Authenticated DELETE.
    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Unauthenticated POST with a JSON body.
    pub async fn post_public(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, None, Some(body)).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token authentication middleware.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::auth::{AuthContext, JwtManager};
use crate::error::{ApiError, AuthError};

/// Paths reachable without a token.
pub const DEFAULT_PUBLIC_PATHS: [&str; 3] = ["/health", "/login", "/register"];

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer for bearer token authentication.
///
/// Verifies the `Authorization: Bearer <token>` header on every non-public
/// request and stores an [`AuthContext`] in the request extensions. Requests
/// that fail verification never reach the inner service.
#[derive(Clone)]
pub struct AuthLayer {
    jwt_manager: Arc<JwtManager>,
    public_paths: Arc<HashSet<String>>,
}

impl AuthLayer {
    /// Creates a new auth layer with no public paths.
    pub fn new(jwt_manager: Arc<JwtManager>) -> Self {
        Self {
            jwt_manager,
            public_paths: Arc::new(HashSet::new()),
        }
    }

    /// Sets the paths that don't require authentication.
    pub fn with_public_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.public_paths = Arc::new(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Uses [`DEFAULT_PUBLIC_PATHS`].
    pub fn with_default_public_paths(self) -> Self {
        self.with_public_paths(DEFAULT_PUBLIC_PATHS)
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            jwt_manager: self.jwt_manager.clone(),
            public_paths: self.public_paths.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware for bearer token authentication.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    jwt_manager: Arc<JwtManager>,
    public_paths: Arc<HashSet<String>>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let jwt_manager = self.jwt_manager.clone();
        let is_public = self.public_paths.contains(req.uri().path());
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if is_public {
                return inner.call(req).await;
            }

            let verified = extract_bearer_token(&req)
                .ok_or(AuthError::MissingToken)
                .and_then(|token| jwt_manager.verify(token));

            match verified {
                Ok(identity) => {
                    let ctx = AuthContext::new(identity);
                    tracing::trace!(
                        request_id = %ctx.request_id,
                        subject = %identity.subject,
                        role = %identity.role,
                        "Request authenticated"
                    );
                    req.extensions_mut().insert(ctx);
                    inner.call(req).await
                }
                Err(e) => {
                    tracing::debug!(error = %e, path = %req.uri().path(), "Authentication failed");
                    Ok(ApiError::from(e).into_response())
                }
            }
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Extracts the token from an `Authorization: Bearer <token>` header.
///
/// A missing header, another scheme or an empty token all yield `None`.
pub fn extract_bearer_token<B>(req: &Request<B>) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/patients");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&request(Some("Bearer abc"))), Some("abc"));
        assert_eq!(extract_bearer_token(&request(Some("bearer abc "))), Some("abc"));
        assert_eq!(extract_bearer_token(&request(Some("Basic abc"))), None);
        assert_eq!(extract_bearer_token(&request(Some("Bearer "))), None);
        assert_eq!(extract_bearer_token(&request(Some("abc"))), None);
        assert_eq!(extract_bearer_token(&request(None)), None);
    }
}

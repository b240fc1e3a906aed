// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-route permission check.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::auth::{ActionKind, AuthContext, RbacPolicy, ResourceKind};
use crate::error::{ApiError, AuthError};

// =============================================================================
// RbacLayer
// =============================================================================

/// Layer that guards one route with one `(resource, action)` pair.
///
/// Must run inside [`AuthLayer`](super::AuthLayer): the identity is read from
/// the request extensions. Denied requests never reach the handler.
#[derive(Clone)]
pub struct RbacLayer {
    policy: Arc<RbacPolicy>,
    resource: ResourceKind,
    action: ActionKind,
}

impl RbacLayer {
    /// Creates a layer requiring `action` on `resource`.
    pub fn new(policy: Arc<RbacPolicy>, resource: ResourceKind, action: ActionKind) -> Self {
        Self {
            policy,
            resource,
            action,
        }
    }
}

impl<S> Layer<S> for RbacLayer {
    type Service = RbacMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RbacMiddleware {
            inner,
            policy: self.policy.clone(),
            resource: self.resource,
            action: self.action,
        }
    }
}

// =============================================================================
// RbacMiddleware
// =============================================================================

/// Middleware for RBAC enforcement.
#[derive(Clone)]
pub struct RbacMiddleware<S> {
    inner: S,
    policy: Arc<RbacPolicy>,
    resource: ResourceKind,
    action: ActionKind,
}

impl<S> Service<Request<Body>> for RbacMiddleware<S>
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

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let policy = self.policy.clone();
        let resource = self.resource;
        let action = self.action;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let Some(ctx) = req.extensions().get::<AuthContext>().copied() else {
                tracing::warn!(%resource, %action, "No auth context found, denying access");
                return Ok(ApiError::from(AuthError::MissingToken).into_response());
            };

            if policy.authorize(&ctx.identity, resource, action).is_allowed() {
                inner.call(req).await
            } else {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    subject = %ctx.identity.subject,
                    role = %ctx.identity.role,
                    %resource,
                    %action,
                    "Permission denied"
                );
                Ok(ApiError::forbidden("Insufficient permissions").into_response())
            }
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

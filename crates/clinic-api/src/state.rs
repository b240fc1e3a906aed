// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use clinic_core::{ReadModel, RoomCoordinator, Store};

use crate::auth::{JwtManager, RbacPolicy};
use crate::config::ApiConfig;
use crate::error::ApiResult;

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
///
/// Every component is constructed once at startup and shared behind `Arc`.
/// Cloning the state is cheap.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// JWT manager for token operations.
    pub jwt_manager: Arc<JwtManager>,
    /// Permission matrix.
    pub rbac_policy: Arc<RbacPolicy>,
    /// Entity collections.
    pub store: Store,
    /// Serializes every room occupancy change.
    pub rooms: Arc<RoomCoordinator>,
    /// Dashboard aggregations.
    pub read_model: Arc<ReadModel>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the JWT manager.
    pub fn jwt(&self) -> &JwtManager {
        &self.jwt_manager
    }

    /// Returns the RBAC policy.
    pub fn rbac(&self) -> &RbacPolicy {
        &self.rbac_policy
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("addr", &self.config.socket_addr())
            .field("jwt_manager", &self.jwt_manager)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    jwt_manager: Option<Arc<JwtManager>>,
    rbac_policy: Option<Arc<RbacPolicy>>,
    store: Option<Store>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the JWT manager.
    pub fn jwt_manager(mut self, manager: Arc<JwtManager>) -> Self {
        self.jwt_manager = Some(manager);
        self
    }

    /// Sets the RBAC policy.
    pub fn rbac_policy(mut self, policy: Arc<RbacPolicy>) -> Self {
        self.rbac_policy = Some(policy);
        self
    }

    /// Sets the store. Defaults to an empty in-memory store.
    ///
    /// A store that already holds occupied rooms needs
    /// [`RoomCoordinator::rebuild_index`] before serving.
    pub fn store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the AppState.
    ///
    /// Fails if no JWT manager was given and the configured JWT settings are
    /// invalid.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();

        let jwt_manager = match self.jwt_manager {
            Some(manager) => manager,
            None => Arc::new(JwtManager::new(config.jwt.clone())?),
        };

        let rbac_policy = self.rbac_policy.unwrap_or_else(|| Arc::new(RbacPolicy::new()));
        let store = self.store.unwrap_or_else(Store::in_memory);

        Ok(AppState {
            config: Arc::new(config),
            jwt_manager,
            rbac_policy,
            rooms: Arc::new(RoomCoordinator::new(store.clone())),
            read_model: Arc::new(ReadModel::new(store.clone())),
            store,
        })
    }
}

// =============================================================================
// FromRef implementations for extracting parts of state
// =============================================================================

impl axum::extract::FromRef<AppState> for Arc<JwtManager> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_manager.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<RbacPolicy> {
    fn from_ref(state: &AppState) -> Self {
        state.rbac_policy.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<ApiConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl axum::extract::FromRef<AppState> for Store {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server runtime orchestration.
//!
//! Startup order:
//!
//! 1. Load and validate configuration
//! 2. Build the token manager and the shared application state
//! 3. Rebuild the room occupancy index from storage
//! 4. Serve until a shutdown signal arrives

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use clinic_api::{ApiServer, AppState, JwtManager};
use clinic_core::Store;

use crate::error::{BinError, BinResult};
use crate::loader::{ClinicConfig, ConfigLoader};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// ClinicRuntime
// =============================================================================

/// Owns the configuration and shutdown handle of a running server.
pub struct ClinicRuntime {
    config: Arc<ClinicConfig>,
    store: Store,
    shutdown: ShutdownCoordinator,
}

impl ClinicRuntime {
    /// Creates a runtime over an in-memory store.
    pub fn new(config: ClinicConfig) -> Self {
        Self {
            config: Arc::new(config),
            store: Store::in_memory(),
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Replaces the storage backend.
    pub fn with_store(mut self, store: Store) -> Self {
        self.store = store;
        self
    }

    /// The configuration this runtime serves with.
    pub fn config(&self) -> &ClinicConfig {
        &self.config
    }

    /// A handle that can stop the runtime.
    pub fn shutdown_handle(&self) -> ShutdownCoordinator {
        self.shutdown.clone()
    }

    /// Builds the application state.
    pub async fn initialize(&self) -> BinResult<AppState> {
        info!("Initializing server components...");

        let jwt_manager = JwtManager::new(self.config.api.jwt.clone())
            .map_err(|e| BinError::startup(format!("Failed to create token manager: {}", e)))?;

        let state = AppState::builder()
            .config(self.config.api.clone())
            .jwt_manager(Arc::new(jwt_manager))
            .store(self.store.clone())
            .build()?;

        let occupied = state.rooms.rebuild_index().await?;
        info!(occupied_rooms = occupied, "Room occupancy index rebuilt");

        Ok(state)
    }

    /// Runs the server until shutdown is signaled.
    pub async fn run(self) -> BinResult<()> {
        info!("Starting clinic server v{}", crate::VERSION);

        let state = self.initialize().await?;
        let server = ApiServer::new(state);

        let listener = tokio::spawn({
            let shutdown = self.shutdown.clone();
            async move { shutdown.listen_for_signals().await }
        });

        let result = server
            .run_with_shutdown(self.shutdown.signal())
            .await
            .map_err(BinError::from);

        self.shutdown.initiate_shutdown();
        listener.abort();

        info!("Clinic server shutdown complete");
        result
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for constructing the runtime.
#[derive(Default)]
pub struct RuntimeBuilder {
    config_path: Option<PathBuf>,
    config: Option<ClinicConfig>,
    host: Option<IpAddr>,
    port: Option<u16>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file path.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration directly, bypassing file and environment.
    pub fn config(mut self, config: ClinicConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the listen address.
    pub fn host(mut self, host: Option<IpAddr>) -> Self {
        self.host = host;
        self
    }

    /// Overrides the listen port.
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> BinResult<ClinicRuntime> {
        let mut config = match self.config {
            Some(config) => config,
            None => {
                let mut loader = ConfigLoader::new();
                if let Some(path) = &self.config_path {
                    loader = loader.with_file(path);
                }
                loader.load_unvalidated()?
            }
        };

        if let Some(host) = self.host {
            config.api.host = host;
        }
        if let Some(port) = self.port {
            config.api.port = port;
        }
        config.validate()?;

        Ok(ClinicRuntime::new(config))
    }
}

// =============================================================================
// Tests
// =============================================================================

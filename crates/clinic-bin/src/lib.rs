// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # clinic-bin
//!
//! CLI binary for the clinic backend.
//!
//! - CLI argument parsing with clap
//! - Configuration loading (file + environment) with the `config` crate
//! - Logging initialization
//! - Server runtime and graceful shutdown
//!
//! ## Architecture
//!
//! ```text
//!            main.rs
//!               │
//!            cli.rs
//!               │
//!     ┌─────────┼──────────┐
//!     ▼         ▼          ▼
//! commands   loader     logging
//!     │
//!  runtime ── shutdown
//!     │
//! clinic-api / clinic-core
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (default command)
//! JWT_SECRET=... clinic
//!
//! # Start with a config file
//! clinic -c /etc/clinic/clinic.yaml run
//!
//! # Validate configuration
//! clinic validate
//!
//! # Show version
//! clinic version
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod loader;
pub mod logging;
pub mod runtime;
pub mod shutdown;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use loader::{ClinicConfig, ConfigLoader};
pub use logging::init_logging;
pub use runtime::{ClinicRuntime, RuntimeBuilder};
pub use shutdown::ShutdownCoordinator;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

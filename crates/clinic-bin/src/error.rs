// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Process-level errors of the `clinic` binary and their exit codes.

use thiserror::Error;

/// Result type alias for clinic-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Why the process is about to exit unsuccessfully.
#[derive(Debug, Error)]
pub enum BinError {
    /// The effective configuration is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A component could not be built at startup.
    #[error("Startup failed: {0}")]
    Startup(String),

    /// The server stopped abnormally.
    #[error("Server failed: {0}")]
    Server(String),

    /// Filesystem or socket failure outside the server.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Surfaced from the HTTP layer.
    #[error(transparent)]
    Api(#[from] clinic_api::ApiError),

    /// Surfaced from the domain layer, e.g. while rebuilding the room index.
    #[error(transparent)]
    Core(#[from] clinic_core::CoreError),

    /// A configuration source could not be read or deserialized.
    #[error("Config source error: {0}")]
    Source(#[from] config::ConfigError),

    /// Another error with a description of what was being attempted.
    #[error("{context}: {source}")]
    WithContext {
        /// What was being attempted.
        context: String,
        /// The underlying failure.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a startup error.
    pub fn startup(msg: impl Into<String>) -> Self {
        Self::Startup(msg.into())
    }

    /// Wraps the error with what was being attempted.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Exit code reported to the shell.
    ///
    /// | Code | Meaning                       |
    /// |------|-------------------------------|
    /// | 1    | configuration                 |
    /// | 2    | startup                       |
    /// | 3    | server stopped abnormally     |
    /// | 4    | I/O                           |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Source(_) => 1,
            Self::Startup(_) | Self::Core(_) => 2,
            Self::Server(_) | Self::Api(_) => 3,
            Self::Io(_) => 4,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }
}

/// Prints `error` and its cause chain to stderr, then exits.
pub fn report_error_and_exit(error: BinError) -> ! {
    eprintln!("clinic: {}", error);

    let mut cause = std::error::Error::source(&error);
    while let Some(inner) = cause {
        eprintln!("  caused by: {}", inner);
        cause = inner.source();
    }

    std::process::exit(error.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_exit_code() {
        let err = BinError::config("no secret").with_context("Loading clinic.yaml");
        assert_eq!(err.to_string(), "Loading clinic.yaml: Configuration error: no secret");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BinError::startup("x").exit_code(), 2);
        assert_eq!(BinError::Server("x".into()).exit_code(), 3);
        assert_eq!(
            BinError::from(clinic_api::ApiError::internal("bind")).exit_code(),
            3
        );
        assert_eq!(
            BinError::from(clinic_core::CoreError::storage("down")).exit_code(),
            2
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(BinError::from(io).exit_code(), 4);
    }
}

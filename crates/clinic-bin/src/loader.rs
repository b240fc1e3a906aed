// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! Sources, later ones winning:
//!
//! 1. Built-in defaults.
//! 2. An optional YAML or TOML file (format taken from the extension).
//! 3. `CLINIC_*` environment variables, `__` separating nested keys
//!    (`CLINIC_API__PORT=9090`, `CLINIC_API__JWT__SECRET=...`).
//! 4. `JWT_SECRET`, for the signing secret only.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use clinic_api::ApiConfig;

use crate::error::{BinError, BinResult};

/// Prefix for structured environment overrides.
pub const ENV_PREFIX: &str = "CLINIC";

/// Plain environment variable carrying the token signing secret.
pub const JWT_SECRET_VAR: &str = "JWT_SECRET";

// =============================================================================
// ClinicConfig
// =============================================================================

/// Root configuration of the clinic server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicConfig {
    /// HTTP server, token and CORS settings.
    pub api: ApiConfig,
}

impl ClinicConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> BinResult<()> {
        if self.api.jwt.secret.trim().is_empty() {
            return Err(BinError::config(format!(
                "token signing secret is not set (set {} or api.jwt.secret)",
                JWT_SECRET_VAR
            )));
        }
        self.api
            .validate()
            .map_err(|e| BinError::config(e.to_string()))
    }
}

// =============================================================================
// ConfigLoader
// =============================================================================

/// Builds a [`ClinicConfig`] from file and environment.
///
/// ```ignore
/// let config = ConfigLoader::new().with_file("clinic.yaml").load()?;
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Creates a loader reading only defaults and the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a configuration file. A missing file is skipped.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replaces the process environment with `vars`.
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Loads and validates the configuration.
    pub fn load(self) -> BinResult<ClinicConfig> {
        let config = self.load_unvalidated()?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration without validating it.
    pub fn load_unvalidated(self) -> BinResult<ClinicConfig> {
        let mut builder = Config::builder();

        if let Some(path) = &self.file {
            if path.exists() {
                info!(path = %path.display(), "Loading configuration file");
            } else {
                debug!(path = %path.display(), "Configuration file not found, skipping");
            }
            builder = builder.add_source(File::from(path.as_path()).required(false));
        }

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(self.env.clone());
        builder = builder.add_source(environment);

        let mut config: ClinicConfig = builder
            .build()?
            .try_deserialize()
            .map_err(|e| BinError::from(e).with_context("Failed to parse configuration"))?;

        if let Some(secret) = self.var(JWT_SECRET_VAR) {
            if !secret.is_empty() {
                config.api.jwt.secret = secret;
            }
        }

        Ok(config)
    }

    fn var(&self, name: &str) -> Option<String> {
        match &self.env {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    const SECRET: &str = "a-secret-that-is-long-enough-for-hs256-signing";

    fn file_with(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_defaults_need_secret() {
        let err = ConfigLoader::new().with_env(no_env()).load().unwrap_err();
        assert!(matches!(err, BinError::Configuration(_)));
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_jwt_secret_variable() {
        let config = ConfigLoader::new()
            .with_env([(JWT_SECRET_VAR, SECRET)])
            .load()
            .unwrap();
        assert_eq!(config.api.jwt.secret, SECRET);
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.jwt.expiration_secs, 86_400);
    }

    #[test]
    fn test_yaml_file() {
        let file = file_with(
            ".yaml",
            r#"
api:
  host: 127.0.0.1
  port: 9000
  request_timeout: 5s
  jwt:
    secret: from-the-file-and-long-enough-to-sign
  cors:
    allowed_origins: ["https://clinic.example"]
"#,
        );

        let config = ConfigLoader::new()
            .with_file(file.path())
            .with_env(no_env())
            .load()
            .unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.api.request_timeout, Duration::from_secs(5));
        assert_eq!(config.api.jwt.secret, "from-the-file-and-long-enough-to-sign");
        assert_eq!(config.api.cors.allowed_origins, vec!["https://clinic.example"]);
    }

    #[test]
    fn test_toml_file() {
        let file = file_with(
            ".toml",
            r#"
[api]
port = 7070

[api.jwt]
secret = "toml-secret-long-enough-for-signing-tokens"
"#,
        );

        let config = ConfigLoader::new()
            .with_file(file.path())
            .with_env(no_env())
            .load()
            .unwrap();
        assert_eq!(config.api.port, 7070);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = file_with(".yaml", "api:\n  port: 9000\n  jwt:\n    secret: file-secret\n");

        let config = ConfigLoader::new()
            .with_file(file.path())
            .with_env([("CLINIC_API__PORT", "9191"), (JWT_SECRET_VAR, SECRET)])
            .load()
            .unwrap();
        assert_eq!(config.api.port, 9191);
        assert_eq!(config.api.jwt.secret, SECRET);
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let config = ConfigLoader::new()
            .with_file("/nonexistent/clinic.yaml")
            .with_env([(JWT_SECRET_VAR, SECRET)])
            .load()
            .unwrap();
        assert_eq!(config.api.port, 8080);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let file = file_with(".yaml", "api:\n  port: not-a-port\n");

        let err = ConfigLoader::new()
            .with_file(file.path())
            .with_env([(JWT_SECRET_VAR, SECRET)])
            .load()
            .unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}

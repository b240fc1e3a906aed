// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::BinResult;
use crate::loader::{ClinicConfig, ConfigLoader};

/// Loads and validates the configuration without starting the server.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;
    let file_found = config_path.exists();

    let config = ConfigLoader::new().with_file(config_path).load()?;
    let warnings = collect_warnings(&config, file_found);

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            if file_found {
                println!("  File: {}", config_path.display());
            } else {
                println!("  File: (none, defaults and environment only)");
            }
            println!("  Listen: {}", config.api.socket_addr());
            println!("  Token lifetime: {}s", config.api.jwt.expiration_secs);
            println!("  CORS origins: {}", config.api.cors.allowed_origins.join(", "));

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Effective configuration:");
                println!("{}", to_pretty_json(&config));
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "config_file_found": file_found,
                "summary": {
                    "listen": config.api.socket_addr().to_string(),
                    "token_lifetime_secs": config.api.jwt.expiration_secs,
                    "cors_origins": &config.api.cors.allowed_origins,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&config) } else { None },
            });
            println!("{}", to_pretty_json(&output));
        }
    }

    Ok(())
}

fn collect_warnings(config: &ClinicConfig, file_found: bool) -> Vec<String> {
    let mut warnings = Vec::new();

    if !file_found {
        warnings.push("Configuration file not found; using defaults".to_string());
    }
    if config.api.jwt.secret.len() < 32 {
        warnings.push("Token signing secret is shorter than 32 bytes".to_string());
    }
    if config.api.cors.allows_any_origin() && config.api.cors.allow_credentials {
        warnings.push("CORS allows any origin with credentials".to_string());
    }

    warnings
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "(serialization error)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_api::JwtConfig;

    #[test]
    fn test_warnings() {
        let mut config = ClinicConfig::default();
        config.api.jwt = JwtConfig::new("short");
        config.api.cors.allowed_origins = vec!["*".to_string()];

        let warnings = collect_warnings(&config, false);
        assert_eq!(warnings.len(), 3);

        config.api.jwt = JwtConfig::new("a-secret-that-is-long-enough-for-hs256");
        config.api.cors.allowed_origins = vec!["http://localhost:3000".to_string()];
        assert!(collect_warnings(&config, true).is_empty());
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `run`: Start the HTTP server (default)
//! - `validate`: Validate configuration
//! - `version`: Show version information

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Clinic management backend.
///
/// Serves the clinic REST API: patients, doctors, appointments, medical
/// records, prescriptions, bills, rooms and role dashboards.
#[derive(Parser, Debug)]
#[command(
    name = "clinic",
    author = "Sylvex <contact@sylvex.io>",
    version = clinic_core::VERSION,
    about = "Clinic management backend",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path (optional; missing files are skipped)
    #[arg(
        short,
        long,
        default_value = "clinic.yaml",
        env = "CLINIC_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        default_value = "info",
        env = "CLINIC_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json, compact)
    #[arg(long, default_value = "text", env = "CLINIC_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Enable quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the clinic CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server
    ///
    /// This is the default command when no subcommand is specified.
    Run(RunArgs),

    /// Validate the configuration
    ///
    /// Loads the configuration file and environment overrides, then checks
    /// them without starting the server.
    Validate(ValidateArgs),

    /// Show version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `run` command.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Override the listen address
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Show the effective configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Run` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }

    /// Get the effective log level based on flags.
    pub fn effective_log_level(&self) -> &str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["clinic"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Run(_)));
        assert_eq!(cli.config, PathBuf::from("clinic.yaml"));
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::parse_from(["clinic", "run", "--host", "127.0.0.1", "-p", "9090"]);
        if let Some(Commands::Run(args)) = cli.command {
            assert_eq!(args.host, Some("127.0.0.1".parse().unwrap()));
            assert_eq!(args.port, Some(9090));
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["clinic", "validate", "--show-config", "-f", "json"]);
        if let Some(Commands::Validate(args)) = cli.command {
            assert!(args.show_config);
            assert_eq!(args.format, OutputFormat::Json);
        } else {
            panic!("Expected Validate command");
        }
    }

    #[test]
    fn test_config_path_is_global() {
        let cli = Cli::parse_from(["clinic", "version", "-c", "/etc/clinic/clinic.toml"]);
        assert_eq!(cli.config, PathBuf::from("/etc/clinic/clinic.toml"));
        assert!(matches!(cli.command, Some(Commands::Version)));
    }

    #[test]
    fn test_log_flags() {
        let cli = Cli::parse_from(["clinic", "-l", "trace", "--log-format", "json"]);
        assert_eq!(cli.effective_log_level(), "trace");
        assert_eq!(cli.log_format, LogFormat::Json);

        let cli = Cli::parse_from(["clinic", "-q", "-l", "trace"]);
        assert_eq!(cli.effective_log_level(), "warn");

        let cli = Cli::parse_from(["clinic", "-v"]);
        assert_eq!(cli.effective_log_level(), "debug");
    }
}

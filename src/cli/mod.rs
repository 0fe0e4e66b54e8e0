//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for cepgeo using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// cepgeo - batch CEP geocoder with a persistent coordinate cache
#[derive(Parser, Debug)]
#[command(name = "cepgeo")]
#[command(version, about, long_about = None)]
#[command(author = "Mapa Emprego Teresina Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "cepgeo.toml", env = "CEPGEO_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CEPGEO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Geocode the CEPs of the input CSV and write the enriched outputs
    Geocode(commands::geocode::GeocodeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show coordinate cache composition
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_geocode() {
        let cli = Cli::parse_from(["cepgeo", "geocode"]);
        assert_eq!(cli.config, "cepgeo.toml");
        assert!(matches!(cli.command, Commands::Geocode(_)));
    }

    #[test]
    fn test_cli_parse_geocode_overrides() {
        let cli = Cli::parse_from([
            "cepgeo",
            "geocode",
            "--input",
            "rais.csv",
            "--retry-fallbacks",
            "--no-pause",
        ]);
        match cli.command {
            Commands::Geocode(args) => {
                assert_eq!(args.input, Some("rais.csv".to_string()));
                assert!(args.retry_fallbacks);
                assert!(args.no_pause);
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["cepgeo", "--config", "custom.toml", "geocode"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["cepgeo", "--log-level", "debug", "status"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["cepgeo", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["cepgeo", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.force));
    }
}

//! Validate config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  Input CSV: {}", config.input.csv_path);
                println!("  CEP Column: {}", config.input.cep_column);
                println!("  Output CSV: {}", config.output.csv_path);
                println!("  Cache File: {}", config.cache_path().display());
                println!("  Mapping File: {}", config.mapping_path().display());
                println!("  Postal Registry: {}", config.postal_registry.base_url);
                println!("  Geocoder: {}", config.geocoder.base_url);
                println!("  User-Agent: {}", config.geocoder.user_agent);
                println!(
                    "  Pause: {}ms every {} lookups",
                    config.batch.pause_ms, config.batch.pause_every
                );
                println!("  Checkpoint Every: {} lookups", config.batch.flush_every);
                println!("  Retry Fallbacks: {}", config.batch.retry_fallbacks);
                println!(
                    "  Region: {}, {}, {} ({} fallback ranges)",
                    config.region.municipality,
                    config.region.state,
                    config.region.country,
                    config.region.fallback_ranges.len()
                );
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2)
            }
        }
    }
}

//! Geocode command implementation
//!
//! Runs the batch orchestrator against the configured input CSV.

use crate::config::{load_config_or_default, GeoConfig};
use crate::core::batch::BatchOrchestrator;
use crate::domain::GeoError;
use clap::Args;
use std::path::Path;

/// Arguments for the geocode command
#[derive(Args, Debug)]
pub struct GeocodeArgs {
    /// Override the input CSV path
    #[arg(long)]
    pub input: Option<String>,

    /// Override the enriched output CSV path
    #[arg(long)]
    pub output: Option<String>,

    /// Override the coordinate cache file path
    #[arg(long)]
    pub cache: Option<String>,

    /// Re-attempt live geocoding for CEPs cached with a fallback coordinate
    #[arg(long)]
    pub retry_fallbacks: bool,

    /// Disable the politeness pause between lookups
    #[arg(long)]
    pub no_pause: bool,
}

impl GeocodeArgs {
    /// Execute the geocode command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting geocode command");

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if !Path::new(&config.input.csv_path).exists() {
            tracing::error!(path = %config.input.csv_path, "Input file not found");
            eprintln!("❌ Input file not found: {}", config.input.csv_path);
            return Ok(3);
        }

        println!("🚀 Geocoding CEPs from {}", config.input.csv_path);
        println!("   Cache: {}", config.cache_path().display());
        println!();

        let orchestrator = match BatchOrchestrator::from_config(config) {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create orchestrator");
                eprintln!("Failed to initialize geocoding: {e}");
                return Ok(5);
            }
        };

        let summary = match orchestrator.run().await {
            Ok(s) => s,
            Err(GeoError::InputNotFound(path)) => {
                eprintln!("❌ Input file not found: {path}");
                return Ok(3);
            }
            Err(e) => {
                tracing::error!(error = %e, "Geocoding run failed");
                eprintln!("Geocoding failed: {e}");
                return Ok(5);
            }
        };

        let config = orchestrator.config();
        println!("📊 Geocoding Summary:");
        println!("  Total Records: {}", summary.total_records);
        println!("  Records Without CEP: {}", summary.missing_ceps);
        println!("  Unique CEPs: {}", summary.unique_ceps);
        println!("  Cache Hits: {}", summary.cache_hits);
        println!("  Resolved Live: {}", summary.resolved_live);
        println!("  Resolved via Fallback: {}", summary.resolved_fallback);
        println!("  Checkpoints: {}", summary.checkpoints);
        if summary.failed_saves > 0 {
            println!("  ⚠️  Failed Cache Saves: {}", summary.failed_saves);
        }
        println!("  Records Enriched: {}", summary.records_enriched);
        println!("  Coverage: {:.2}%", summary.coverage_rate());
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();
        println!("✅ Enriched CSV: {}", config.output.csv_path);
        println!(
            "✅ Mapping: {} ({} CEPs)",
            config.mapping_path().display(),
            summary.mapping_entries
        );
        println!();

        Ok(0)
    }

    fn apply_overrides(&self, config: &mut GeoConfig) {
        if let Some(input) = &self.input {
            tracing::info!(input = %input, "Overriding input CSV from CLI");
            config.input.csv_path = input.clone();
        }

        if let Some(output) = &self.output {
            tracing::info!(output = %output, "Overriding output CSV from CLI");
            config.output.csv_path = output.clone();
        }

        if let Some(cache) = &self.cache {
            tracing::info!(cache = %cache, "Overriding cache path from CLI");
            config.output.cache_path = Some(cache.clone());
        }

        if self.retry_fallbacks {
            tracing::info!("Retrying fallback-cached CEPs");
            config.batch.retry_fallbacks = true;
        }

        if self.no_pause {
            tracing::info!("Politeness pause disabled from CLI");
            config.batch.pause_ms = 0;
        }
    }
}

//! Status command implementation
//!
//! Reports the composition of the coordinate cache without touching the
//! network.

use crate::config::load_config;
use crate::core::cache::CacheStore;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Override the coordinate cache file path
    #[arg(long)]
    pub cache: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking cache status");

        println!("📊 Cache Status");
        println!();

        let cache_path = match &self.cache {
            Some(path) => PathBuf::from(path),
            None => match load_config(config_path) {
                Ok(config) => config.cache_path(),
                Err(e) => {
                    println!("❌ Failed to load configuration file");
                    println!("   Error: {}", e);
                    return Ok(2);
                }
            },
        };

        if !cache_path.exists() {
            println!("No cache file found at {}", cache_path.display());
            println!("Run 'cepgeo geocode' to build one.");
            return Ok(0);
        }

        let store = CacheStore::new(&cache_path);
        let stats = store.load().stats();

        println!("Cache file: {}", cache_path.display());
        println!();
        println!("{:<28} {:>10}", "Entry Kind", "Count");
        println!("{}", "-".repeat(39));
        println!("{:<28} {:>10}", "Live geocode", stats.live_geocode);
        println!("{:<28} {:>10}", "Fallback by prefix", stats.fallback_by_prefix);
        println!("{:<28} {:>10}", "Fallback general", stats.fallback_general);
        println!("{:<28} {:>10}", "Address entries", stats.address_entries);
        println!("{:<28} {:>10}", "Unresolved (null)", stats.negative_entries);
        println!("{}", "-".repeat(39));
        println!("{:<28} {:>10}", "Resolved CEPs", stats.resolved_ceps());
        println!("{:<28} {:>10}", "Total entries", stats.total_entries);
        println!();

        Ok(0)
    }
}

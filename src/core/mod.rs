//! Core business logic for cepgeo.
//!
//! # Modules
//!
//! - [`cache`] - Persistent CEP/address coordinate cache
//! - [`geocode`] - Live geocoding client and prefix fallback resolver
//! - [`batch`] - Batch orchestration, CSV enrichment and run summary
//!
//! # Run Workflow
//!
//! 1. **Load Cache**: Read the coordinate cache file (empty if missing or corrupt)
//! 2. **Deduplicate**: Collect distinct CEPs from the input CSV
//! 3. **Resolve**: Geocode each uncached CEP, falling back to the prefix table
//! 4. **Checkpoint**: Flush the cache every `batch.flush_every` resolutions
//! 5. **Enrich**: Copy cached coordinates into every input row
//! 6. **Write**: Emit the enriched CSV and the cleaned CEP mapping
//!
//! # Example
//!
//! ```rust,no_run
//! use cepgeo::config::load_config;
//! use cepgeo::core::batch::BatchOrchestrator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("cepgeo.toml")?;
//! let orchestrator = BatchOrchestrator::from_config(config)?;
//!
//! let summary = orchestrator.run().await?;
//!
//! println!("Unique CEPs: {}", summary.unique_ceps);
//! println!("Resolved live: {}", summary.resolved_live);
//! println!("Resolved via fallback: {}", summary.resolved_fallback);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod cache;
pub mod geocode;

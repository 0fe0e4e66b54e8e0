// cepgeo - CEP geocoding for RAIS employment maps
// Copyright (c) 2025 Mapa Emprego Teresina Contributors
// Licensed under the MIT License

//! # cepgeo - batch CEP geocoding with a persistent cache
//!
//! cepgeo turns the postal codes (CEPs) of RAIS employment records into map
//! coordinates. Each distinct CEP is resolved once, through ViaCEP and
//! Nominatim, and remembered in a JSON cache so later runs cost no network
//! calls. When live geocoding fails, a prefix table gives an approximate
//! coordinate, so every CEP ends up somewhere on the map.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Cache, geocoding client, fallback resolver and batch orchestration
//! - [`adapters`] - External services (ViaCEP, Nominatim)
//! - [`domain`] - CEPs, coordinates and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cepgeo::config::load_config;
//! use cepgeo::core::batch::BatchOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("cepgeo.toml")?;
//!     let orchestrator = BatchOrchestrator::from_config(config)?;
//!
//!     let summary = orchestrator.run().await?;
//!     println!("Enriched {} of {} records", summary.records_enriched, summary.total_records);
//!     Ok(())
//! }
//! ```
//!
//! ## Resolution Order
//!
//! For each CEP not already cached:
//!
//! 1. ViaCEP street address, geocoded by Nominatim
//! 2. `"<municipality>, <state>, <country>, CEP <cep>"`, geocoded by Nominatim
//! 3. Coordinate of the first fallback range whose 4-digit prefix matches
//! 4. Municipal center
//!
//! Steps 1 and 2 share an address cache keyed by a hash of the query text.
//!
//! ## Error Handling
//!
//! Lookup failures are [`domain::LookupError`] values and only ever move
//! resolution to the next step. Run-level failures are [`domain::GeoError`]:
//!
//! ```rust
//! use cepgeo::domain::{GeoError, Result};
//!
//! fn check(path: &str) -> Result<()> {
//!     if path.is_empty() {
//!         return Err(GeoError::InputNotFound("<empty>".to_string()));
//!     }
//!     Ok(())
//! }
//! # assert!(check("").is_err());
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

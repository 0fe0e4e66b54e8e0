//! Configuration management.
//!
//! Configuration is a single immutable [`GeoConfig`] value, loaded once and
//! handed to each component at construction.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cepgeo::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("cepgeo.toml")?;
//! println!("Input: {}", config.input.csv_path);
//! println!("Cache: {}", config.cache_path().display());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`InputConfig`] - Input CSV and CEP column
//! - [`OutputConfig`] - Enriched CSV, cache and mapping files
//! - [`PostalRegistryConfig`] - ViaCEP endpoint and timeout
//! - [`GeocoderConfig`] - Nominatim endpoint, User-Agent and timeout
//! - [`BatchConfig`] - Politeness pause and checkpoint interval
//! - [`RegionConfig`] - Municipality and prefix fallback table
//! - [`LoggingConfig`] - File logging
//!
//! # Example Configuration
//!
//! ```toml
//! [input]
//! csv_path = "data/empregos_rais.csv"
//!
//! [geocoder]
//! user_agent = "${CEPGEO_CONTACT_AGENT}"
//!
//! [batch]
//! pause_ms = 500
//! flush_every = 50
//! ```
//!
//! `${VAR_NAME}` placeholders are substituted from the environment, and any
//! value can be overridden with `CEPGEO_<SECTION>_<KEY>` variables.

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_or_default, parse_config};
pub use schema::{
    ApplicationConfig, BatchConfig, FallbackRange, GeoConfig, GeocoderConfig, InputConfig,
    LoggingConfig, OutputConfig, PostalRegistryConfig, RegionConfig,
};

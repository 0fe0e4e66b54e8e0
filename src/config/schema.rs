//! Configuration schema types
//!
//! Every section implements `Default`, so a configuration file only needs to
//! name the values it changes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the coordinate cache when `output.cache_path` is not set
pub const DEFAULT_CACHE_FILE: &str = "cep_coordinates_cache.json";

/// File name of the cleaned mapping when `output.mapping_path` is not set
pub const DEFAULT_MAPPING_FILE: &str = "cep_coordenadas_mapping.json";

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoConfig {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub postal_registry: PostalRegistryConfig,

    #[serde(default)]
    pub geocoder: GeocoderConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub region: RegionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GeoConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value found
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.input.validate()?;
        self.output.validate()?;
        self.postal_registry.validate()?;
        self.geocoder.validate()?;
        self.batch.validate()?;
        self.region.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Cache file path, defaulting to a file next to the input CSV
    pub fn cache_path(&self) -> PathBuf {
        match &self.output.cache_path {
            Some(path) => PathBuf::from(path),
            None => sibling(&self.input.csv_path, DEFAULT_CACHE_FILE),
        }
    }

    /// Cleaned mapping path, defaulting to a file next to the output CSV
    pub fn mapping_path(&self) -> PathBuf {
        match &self.output.mapping_path {
            Some(path) => PathBuf::from(path),
            None => sibling(&self.output.csv_path, DEFAULT_MAPPING_FILE),
        }
    }
}

fn sibling(path: &str, file_name: &str) -> PathBuf {
    Path::new(path)
        .parent()
        .map(|dir| dir.join(file_name))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Input dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// CSV with one row per employment record
    #[serde(default = "default_input_csv")]
    pub csv_path: String,

    /// Name of the column holding the CEP
    #[serde(default = "default_cep_column")]
    pub cep_column: String,
}

impl InputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.csv_path.trim().is_empty() {
            return Err("input.csv_path cannot be empty".to_string());
        }
        if self.cep_column.trim().is_empty() {
            return Err("input.cep_column cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_input_csv(),
            cep_column: default_cep_column(),
        }
    }
}

/// Output artifacts configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enriched CSV
    #[serde(default = "default_output_csv")]
    pub csv_path: String,

    /// Coordinate cache file (default: next to the input CSV)
    #[serde(default)]
    pub cache_path: Option<String>,

    /// Cleaned CEP mapping file (default: next to the output CSV)
    #[serde(default)]
    pub mapping_path: Option<String>,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.csv_path.trim().is_empty() {
            return Err("output.csv_path cannot be empty".to_string());
        }
        if matches!(&self.cache_path, Some(p) if p.trim().is_empty()) {
            return Err("output.cache_path cannot be empty when set".to_string());
        }
        if matches!(&self.mapping_path, Some(p) if p.trim().is_empty()) {
            return Err("output.mapping_path cannot be empty when set".to_string());
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_output_csv(),
            cache_path: None,
            mapping_path: None,
        }
    }
}

/// Postal-registry (ViaCEP) service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostalRegistryConfig {
    /// Base URL; requests go to `{base_url}/{cep}/json/`
    #[serde(default = "default_viacep_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl PostalRegistryConfig {
    fn validate(&self) -> Result<(), String> {
        validate_http_url("postal_registry.base_url", &self.base_url)?;
        validate_timeout("postal_registry.timeout_seconds", self.timeout_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for PostalRegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_viacep_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Geocoding search (Nominatim) service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Base URL; requests go to `{base_url}/search`
    #[serde(default = "default_nominatim_url")]
    pub base_url: String,

    /// User-Agent sent with every request, required by the Nominatim usage policy
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl GeocoderConfig {
    fn validate(&self) -> Result<(), String> {
        validate_http_url("geocoder.base_url", &self.base_url)?;
        if self.user_agent.trim().is_empty() {
            return Err("geocoder.user_agent cannot be empty".to_string());
        }
        validate_timeout("geocoder.timeout_seconds", self.timeout_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_nominatim_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Batch pacing and checkpointing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Pause after every N new resolutions
    #[serde(default = "default_pause_every")]
    pub pause_every: usize,

    /// Pause length in milliseconds (0 disables pausing)
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,

    /// Flush the cache to disk after every N new resolutions
    #[serde(default = "default_flush_every")]
    pub flush_every: usize,

    /// Re-attempt live geocoding for CEPs cached from the fallback table
    #[serde(default)]
    pub retry_fallbacks: bool,
}

impl BatchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.pause_every == 0 {
            return Err("batch.pause_every must be > 0".to_string());
        }
        if self.flush_every == 0 {
            return Err("batch.flush_every must be > 0".to_string());
        }
        if self.pause_ms > 60_000 {
            return Err(format!(
                "batch.pause_ms must be <= 60000, got {}",
                self.pause_ms
            ));
        }
        Ok(())
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            pause_every: default_pause_every(),
            pause_ms: default_pause_ms(),
            flush_every: default_flush_every(),
            retry_fallbacks: false,
        }
    }
}

/// Approximate coordinate for a CEP prefix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackRange {
    /// Four-digit CEP prefix
    pub prefix: String,
    pub lat: f64,
    pub lon: f64,
    /// Human-readable area name, for logs
    #[serde(default)]
    pub area: String,
}

impl FallbackRange {
    pub fn new(prefix: &str, lat: f64, lon: f64, area: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            lat,
            lon,
            area: area.to_string(),
        }
    }
}

/// Target municipality: generic query parts and the fallback table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    #[serde(default = "default_municipality")]
    pub municipality: String,

    #[serde(default = "default_state")]
    pub state: String,

    #[serde(default = "default_country")]
    pub country: String,

    /// Municipal-center latitude used when no prefix matches
    #[serde(default = "default_center_lat")]
    pub default_lat: f64,

    /// Municipal-center longitude used when no prefix matches
    #[serde(default = "default_center_lon")]
    pub default_lon: f64,

    #[serde(default = "default_fallback_ranges")]
    pub fallback_ranges: Vec<FallbackRange>,
}

impl RegionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.municipality.trim().is_empty() {
            return Err("region.municipality cannot be empty".to_string());
        }
        validate_coordinate("region.default", self.default_lat, self.default_lon)?;

        let mut seen = HashSet::new();
        for range in &self.fallback_ranges {
            if range.prefix.len() != 4 || !range.prefix.chars().all(|c| c.is_ascii_digit()) {
                return Err(format!(
                    "region.fallback_ranges prefix must be 4 digits, got '{}'",
                    range.prefix
                ));
            }
            if !seen.insert(range.prefix.as_str()) {
                return Err(format!(
                    "region.fallback_ranges has duplicate prefix '{}'",
                    range.prefix
                ));
            }
            validate_coordinate(
                &format!("region.fallback_ranges[{}]", range.prefix),
                range.lat,
                range.lon,
            )?;
        }
        Ok(())
    }

    /// Generic query used when the postal registry gives nothing usable
    pub fn generic_query(&self, cep: &str) -> String {
        format!(
            "{}, {}, {}, CEP {}",
            self.municipality, self.state, self.country, cep
        )
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            municipality: default_municipality(),
            state: default_state(),
            country: default_country(),
            default_lat: default_center_lat(),
            default_lon: default_center_lon(),
            fallback_ranges: default_fallback_ranges(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), String> {
    let parsed = url::Url::parse(value).map_err(|e| format!("{field} is not a valid URL: {e}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("{field} must start with http:// or https://"));
    }
    Ok(())
}

fn validate_timeout(field: &str, seconds: u64) -> Result<(), String> {
    if !(1..=120).contains(&seconds) {
        return Err(format!("{field} must be between 1 and 120, got {seconds}"));
    }
    Ok(())
}

fn validate_coordinate(field: &str, lat: f64, lon: f64) -> Result<(), String> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(format!("{field} coordinate out of range: ({lat}, {lon})"));
    }
    Ok(())
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_input_csv() -> String {
    "data/empregos_rais.csv".to_string()
}

fn default_cep_column() -> String {
    "cep".to_string()
}

fn default_output_csv() -> String {
    "data/ceps_com_coordenadas_otimizado.csv".to_string()
}

fn default_viacep_url() -> String {
    "https://viacep.com.br/ws".to_string()
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    "mapa-emprego-teresina/1.0".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_pause_every() -> usize {
    5
}

fn default_pause_ms() -> u64 {
    500
}

fn default_flush_every() -> usize {
    50
}

fn default_municipality() -> String {
    "Teresina".to_string()
}

fn default_state() -> String {
    "PI".to_string()
}

fn default_country() -> String {
    "Brasil".to_string()
}

fn default_center_lat() -> f64 {
    -5.0892
}

fn default_center_lon() -> f64 {
    -42.8019
}

fn default_fallback_ranges() -> Vec<FallbackRange> {
    vec![
        FallbackRange::new("6400", -5.0892, -42.8019, "Centro"),
        FallbackRange::new("6401", -5.0979, -42.7971, "Centro"),
        FallbackRange::new("6402", -5.1214, -42.7922, "Zona Sul"),
        FallbackRange::new("6403", -5.1345, -42.7845, "Zona Sul"),
        FallbackRange::new("6404", -5.0781, -42.7842, "Zona Leste"),
        FallbackRange::new("6405", -5.0647, -42.7648, "Zona Leste"),
        FallbackRange::new("6406", -5.0464, -42.7514, "Zona Norte"),
        FallbackRange::new("6407", -5.1177, -42.7548, "Zona Norte"),
        FallbackRange::new("6408", -5.1795, -42.7580, "Áreas Periféricas"),
        FallbackRange::new("6409", -5.1890, -42.7399, "Áreas Periféricas"),
    ]
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

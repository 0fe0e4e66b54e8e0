//! Init command implementation
//!
//! Writes a starter configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "cepgeo.toml")]
    pub output: String,

    /// Include every option with comments and the full fallback table
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing cepgeo configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your input and output paths", self.output);
                println!("  2. Set geocoder.user_agent to identify your project to Nominatim");
                println!("  3. Validate configuration: cepgeo validate-config");
                println!("  4. Run: cepgeo geocode");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# cepgeo Configuration File
# Batch CEP geocoder for RAIS employment maps

[application]
log_level = "info"

[input]
csv_path = "data/empregos_rais.csv"
cep_column = "cep"

[output]
csv_path = "data/ceps_com_coordenadas_otimizado.csv"

[geocoder]
user_agent = "mapa-emprego-teresina/1.0"

[batch]
pause_every = 5
pause_ms = 500
flush_every = 50

[logging]
local_enabled = false
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# cepgeo Configuration File
# Batch CEP geocoder for RAIS employment maps
#
# Every section is optional; omitted values take the defaults shown here.
# ${VAR_NAME} placeholders are read from the environment, and any value can
# be overridden with CEPGEO_<SECTION>_<KEY> (e.g. CEPGEO_BATCH_PAUSE_MS=0).

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Input
# ============================================================================
[input]
# CSV with one row per employment record
csv_path = "data/empregos_rais.csv"

# Column holding the CEP
cep_column = "cep"

# ============================================================================
# Output
# ============================================================================
[output]
# Input columns plus latitude, longitude and coord_source
csv_path = "data/ceps_com_coordenadas_otimizado.csv"

# Coordinate cache (default: cep_coordinates_cache.json next to the input)
# cache_path = "data/cep_coordinates_cache.json"

# Cleaned CEP mapping (default: cep_coordenadas_mapping.json next to the output)
# mapping_path = "data/cep_coordenadas_mapping.json"

# ============================================================================
# Postal Registry (ViaCEP)
# ============================================================================
[postal_registry]
base_url = "https://viacep.com.br/ws"
timeout_seconds = 10

# ============================================================================
# Geocoder (Nominatim)
# ============================================================================
[geocoder]
base_url = "https://nominatim.openstreetmap.org"

# Nominatim's usage policy requires an identifying User-Agent
user_agent = "mapa-emprego-teresina/1.0"

timeout_seconds = 10

# ============================================================================
# Batch
# ============================================================================
[batch]
# Pause pause_ms milliseconds after every pause_every live resolutions
pause_every = 5
pause_ms = 500

# Write the cache file after every flush_every resolutions
flush_every = 50

# Re-attempt live geocoding for CEPs cached with a fallback coordinate
retry_fallbacks = false

# ============================================================================
# Region
# ============================================================================
[region]
municipality = "Teresina"
state = "PI"
country = "Brasil"

# Municipal center, used when no prefix matches
default_lat = -5.0892
default_lon = -42.8019

# First matching 4-digit prefix wins
[[region.fallback_ranges]]
prefix = "6400"
lat = -5.0892
lon = -42.8019
area = "Centro"

[[region.fallback_ranges]]
prefix = "6401"
lat = -5.0979
lon = -42.7971
area = "Centro"

[[region.fallback_ranges]]
prefix = "6402"
lat = -5.1214
lon = -42.7922
area = "Zona Sul"

[[region.fallback_ranges]]
prefix = "6403"
lat = -5.1345
lon = -42.7845
area = "Zona Sul"

[[region.fallback_ranges]]
prefix = "6404"
lat = -5.0781
lon = -42.7842
area = "Zona Leste"

[[region.fallback_ranges]]
prefix = "6405"
lat = -5.0647
lon = -42.7648
area = "Zona Leste"

[[region.fallback_ranges]]
prefix = "6406"
lat = -5.0464
lon = -42.7514
area = "Zona Norte"

[[region.fallback_ranges]]
prefix = "6407"
lat = -5.1177
lon = -42.7548
area = "Zona Norte"

[[region.fallback_ranges]]
prefix = "6408"
lat = -5.1795
lon = -42.7580
area = "Áreas Periféricas"

[[region.fallback_ranges]]
prefix = "6409"
lat = -5.1890
lon = -42.7399
area = "Áreas Periféricas"

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON file logging in addition to the console
local_enabled = false
local_path = "logs"

# Rotation: daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}

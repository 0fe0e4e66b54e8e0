//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::GeoConfig;
use crate::domain::errors::GeoError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "CEPGEO";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`GeoConfig`]
/// 4. Applies environment variable overrides (`CEPGEO_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`GeoError::Configuration`] if the file cannot be read, a referenced
/// variable is unset, parsing fails, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use cepgeo::config::loader::load_config;
///
/// let config = load_config("cepgeo.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<GeoConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(GeoError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        GeoError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Loads configuration, using built-in defaults when the file is absent
///
/// Environment overrides still apply to the defaults. A file that exists but
/// cannot be read or parsed is an error, as with [`load_config`].
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<GeoConfig> {
    let path = path.as_ref();

    if !path.exists() {
        tracing::info!(path = %path.display(), "No configuration file, using defaults");
        return parse_config("");
    }

    load_config(path)
}

/// Parses configuration text, applying substitution, overrides and validation
pub fn parse_config(contents: &str) -> Result<GeoConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: GeoConfig = toml::from_str(&contents)
        .map_err(|e| GeoError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        GeoError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| GeoError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(GeoError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{key}")).ok()
}

/// Applies environment variable overrides using the `CEPGEO_*` prefix
///
/// Variables follow the pattern `CEPGEO_<SECTION>_<KEY>`, for example
/// `CEPGEO_INPUT_CSV_PATH` or `CEPGEO_BATCH_PAUSE_MS`. Unparseable numeric
/// values are ignored.
fn apply_env_overrides(config: &mut GeoConfig) {
    if let Some(val) = env_override("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Some(val) = env_override("INPUT_CSV_PATH") {
        config.input.csv_path = val;
    }
    if let Some(val) = env_override("INPUT_CEP_COLUMN") {
        config.input.cep_column = val;
    }

    if let Some(val) = env_override("OUTPUT_CSV_PATH") {
        config.output.csv_path = val;
    }
    if let Some(val) = env_override("OUTPUT_CACHE_PATH") {
        config.output.cache_path = Some(val);
    }
    if let Some(val) = env_override("OUTPUT_MAPPING_PATH") {
        config.output.mapping_path = Some(val);
    }

    if let Some(val) = env_override("POSTAL_REGISTRY_BASE_URL") {
        config.postal_registry.base_url = val;
    }
    if let Some(val) = env_override("POSTAL_REGISTRY_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.postal_registry.timeout_seconds = timeout;
        }
    }

    if let Some(val) = env_override("GEOCODER_BASE_URL") {
        config.geocoder.base_url = val;
    }
    if let Some(val) = env_override("GEOCODER_USER_AGENT") {
        config.geocoder.user_agent = val;
    }
    if let Some(val) = env_override("GEOCODER_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.geocoder.timeout_seconds = timeout;
        }
    }

    if let Some(val) = env_override("BATCH_PAUSE_EVERY") {
        if let Ok(n) = val.parse() {
            config.batch.pause_every = n;
        }
    }
    if let Some(val) = env_override("BATCH_PAUSE_MS") {
        if let Ok(ms) = val.parse() {
            config.batch.pause_ms = ms;
        }
    }
    if let Some(val) = env_override("BATCH_FLUSH_EVERY") {
        if let Ok(n) = val.parse() {
            config.batch.flush_every = n;
        }
    }
    if let Some(val) = env_override("BATCH_RETRY_FALLBACKS") {
        config.batch.retry_fallbacks = val.parse().unwrap_or(false);
    }

    if let Some(val) = env_override("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = env_override("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

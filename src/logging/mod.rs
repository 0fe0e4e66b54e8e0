//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - console output with a configurable level
//! - optional JSON file output with rotation
//! - event macros for the resolution pipeline
//!
//! # Example
//!
//! ```no_run
//! use cepgeo::logging::init_logging;
//! use cepgeo::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(unique_ceps = 812, "Resolving CEPs");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a CEP resolved by the live geocoding services
///
/// # Example
///
/// ```no_run
/// use cepgeo::log_cep_resolved;
/// use cepgeo::domain::{Cep, CoordinateRecord, CoordinateSource, GeoPoint};
///
/// let cep = Cep::parse("64000020").unwrap();
/// let record = CoordinateRecord::new(GeoPoint::new(-5.09, -42.80), CoordinateSource::LiveGeocode);
/// log_cep_resolved!(&cep, &record);
/// ```
#[macro_export]
macro_rules! log_cep_resolved {
    ($cep:expr, $record:expr) => {
        tracing::info!(
            cep = %$cep,
            lat = $record.lat,
            lon = $record.lon,
            source = %$record.source,
            "CEP resolved"
        );
    };
}

/// Log a CEP that fell back to an approximate coordinate
///
/// # Example
///
/// ```no_run
/// use cepgeo::log_cep_fallback;
/// use cepgeo::domain::{Cep, CoordinateRecord, CoordinateSource, GeoPoint, LookupError};
///
/// let cep = Cep::parse("64049999").unwrap();
/// let record = CoordinateRecord::new(GeoPoint::new(-5.0781, -42.7842), CoordinateSource::FallbackByPrefix);
/// let reason = LookupError::NoCandidates("Teresina, PI, Brasil, CEP 64049999".to_string());
/// log_cep_fallback!(&cep, &record, &reason);
/// ```
#[macro_export]
macro_rules! log_cep_fallback {
    ($cep:expr, $record:expr, $reason:expr) => {
        tracing::warn!(
            cep = %$cep,
            lat = $record.lat,
            lon = $record.lon,
            source = %$record.source,
            reason = %$reason,
            "Live geocoding failed, using fallback coordinate"
        );
    };
}

/// Log a cache checkpoint
///
/// # Example
///
/// ```no_run
/// use cepgeo::log_checkpoint;
///
/// log_checkpoint!(50, 812, 1240);
/// ```
#[macro_export]
macro_rules! log_checkpoint {
    ($resolved:expr, $total:expr, $entries:expr) => {
        tracing::info!(
            resolved = $resolved,
            total = $total,
            cache_entries = $entries,
            progress_pct = ($resolved as f64 / $total as f64 * 100.0),
            "Cache checkpoint written"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::{Cep, CoordinateRecord, CoordinateSource, GeoPoint, LookupError};

    #[test]
    fn test_macros_expand() {
        let cep = Cep::parse("64049999").unwrap();
        let record = CoordinateRecord::new(
            GeoPoint::new(-5.0781, -42.7842),
            CoordinateSource::FallbackByPrefix,
        );
        let reason = LookupError::NotFound(cep.to_string());

        log_cep_resolved!(&cep, &record);
        log_cep_fallback!(&cep, &record, &reason);
        log_checkpoint!(50usize, 100usize, 120usize);
    }
}

//! Coordinate value types stored in the cache and written to output rows

use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Provenance of a resolved coordinate
///
/// Older cache files use the labels `viacep+nominatim`, `nominatim_fallback`
/// and `fallback_geral`; they are accepted when reading and rewritten with
/// the current labels on the next save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSource {
    /// Resolved through the geocoding service (either address path)
    #[serde(alias = "viacep+nominatim", alias = "nominatim_fallback")]
    LiveGeocode,
    /// Approximated from the CEP's four-digit prefix
    FallbackByPrefix,
    /// Municipal-center default
    #[serde(alias = "fallback_geral")]
    FallbackGeneral,
}

impl CoordinateSource {
    /// Label written to the cache and to the `coord_source` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LiveGeocode => "live_geocode",
            Self::FallbackByPrefix => "fallback_by_prefix",
            Self::FallbackGeneral => "fallback_general",
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::LiveGeocode)
    }
}

impl fmt::Display for CoordinateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved coordinate for a CEP
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateRecord {
    pub lat: f64,
    pub lon: f64,
    pub source: CoordinateSource,
}

impl CoordinateRecord {
    pub fn new(point: GeoPoint, source: CoordinateSource) -> Self {
        Self {
            lat: point.lat,
            lon: point.lon,
            source,
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Geocoded free-text address, stored under an `addr_<hash>` key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AddressCacheEntry {
    pub lat: f64,
    pub lon: f64,
}

impl From<GeoPoint> for AddressCacheEntry {
    fn from(point: GeoPoint) -> Self {
        Self {
            lat: point.lat,
            lon: point.lon,
        }
    }
}

impl From<AddressCacheEntry> for GeoPoint {
    fn from(entry: AddressCacheEntry) -> Self {
        GeoPoint::new(entry.lat, entry.lon)
    }
}

/// A value in the flat cache mapping
///
/// Variant order matters for the untagged representation: an object with a
/// `source` field is a CEP record, one with only `lat`/`lon` is an address entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheValue {
    Coordinate(CoordinateRecord),
    Address(AddressCacheEntry),
}

impl CacheValue {
    pub fn as_coordinate(&self) -> Option<&CoordinateRecord> {
        match self {
            Self::Coordinate(record) => Some(record),
            Self::Address(_) => None,
        }
    }

    pub fn point(&self) -> GeoPoint {
        match self {
            Self::Coordinate(record) => record.point(),
            Self::Address(entry) => (*entry).into(),
        }
    }
}

impl From<CoordinateRecord> for CacheValue {
    fn from(record: CoordinateRecord) -> Self {
        Self::Coordinate(record)
    }
}

impl From<AddressCacheEntry> for CacheValue {
    fn from(entry: AddressCacheEntry) -> Self {
        Self::Address(entry)
    }
}

//! Prefix-based fallback coordinates
//!
//! Total by construction: every CEP yields a coordinate, either from the
//! first table entry whose prefix matches or from the municipal center.

use crate::config::{FallbackRange, RegionConfig};
use crate::domain::{Cep, CoordinateRecord, CoordinateSource, GeoPoint};

/// Resolver over a static prefix → coordinate table
#[derive(Debug, Clone)]
pub struct FallbackResolver {
    ranges: Vec<FallbackRange>,
    center: GeoPoint,
}

impl FallbackResolver {
    pub fn new(ranges: Vec<FallbackRange>, center: GeoPoint) -> Self {
        Self { ranges, center }
    }

    pub fn from_config(region: &RegionConfig) -> Self {
        Self::new(
            region.fallback_ranges.clone(),
            GeoPoint::new(region.default_lat, region.default_lon),
        )
    }

    /// Approximate coordinate for a CEP; never fails
    ///
    /// # Examples
    ///
    /// ```
    /// use cepgeo::config::RegionConfig;
    /// use cepgeo::core::geocode::FallbackResolver;
    /// use cepgeo::domain::{Cep, CoordinateSource};
    ///
    /// let resolver = FallbackResolver::from_config(&RegionConfig::default());
    /// let record = resolver.resolve(&Cep::parse("64049999").unwrap());
    /// assert_eq!((record.lat, record.lon), (-5.0781, -42.7842));
    /// assert_eq!(record.source, CoordinateSource::FallbackByPrefix);
    /// ```
    pub fn resolve(&self, cep: &Cep) -> CoordinateRecord {
        let prefix = cep.prefix();

        match self.ranges.iter().find(|range| range.prefix == prefix) {
            Some(range) => {
                tracing::debug!(cep = %cep, prefix = %prefix, area = %range.area, "Prefix fallback matched");
                CoordinateRecord::new(
                    GeoPoint::new(range.lat, range.lon),
                    CoordinateSource::FallbackByPrefix,
                )
            }
            None => CoordinateRecord::new(self.center, CoordinateSource::FallbackGeneral),
        }
    }
}

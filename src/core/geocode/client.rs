//! Two-tier live geocoding for a single CEP
//!
//! Tier one asks the postal registry for the CEP's street address and
//! geocodes it. Tier two geocodes a generic `"<municipality>, <state>,
//! <country>, CEP <cep>"` query. Both tiers go through the address cache, so
//! identical query strings hit the geocoding service once.

use crate::adapters::traits::{GeocodingService, PostalRegistry};
use crate::config::RegionConfig;
use crate::core::cache::{CoordinateCache, ADDRESS_KEY_PREFIX};
use crate::domain::{Cep, CoordinateRecord, CoordinateSource, GeoPoint, LookupError};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Leading SHA-256 bytes kept in an address key
const ADDRESS_HASH_BYTES: usize = 8;

/// Cache key for a free-text address: `addr_` + 16 hex digits of its SHA-256
///
/// # Examples
///
/// ```
/// use cepgeo::core::geocode::address_cache_key;
///
/// let key = address_cache_key("Rua Areolino de Abreu, Centro, Teresina, PI");
/// assert!(key.starts_with("addr_"));
/// assert_eq!(key.len(), 21);
/// ```
pub fn address_cache_key(address: &str) -> String {
    let digest = Sha256::digest(address.as_bytes());
    let hash: String = digest
        .iter()
        .take(ADDRESS_HASH_BYTES)
        .map(|byte| format!("{byte:02x}"))
        .collect();
    format!("{ADDRESS_KEY_PREFIX}{hash}")
}

/// Live geocoding client over a postal registry and a geocoding service
pub struct GeocodingClient {
    registry: Arc<dyn PostalRegistry>,
    geocoder: Arc<dyn GeocodingService>,
    region: RegionConfig,
}

impl GeocodingClient {
    pub fn new(
        registry: Arc<dyn PostalRegistry>,
        geocoder: Arc<dyn GeocodingService>,
        region: RegionConfig,
    ) -> Self {
        Self {
            registry,
            geocoder,
            region,
        }
    }

    /// Resolves a CEP through the live services
    ///
    /// Address-cache entries are written into `cache` as a side effect; the
    /// CEP entry itself is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns the generic-query tier's [`LookupError`] when every attempt
    /// failed. Earlier tier failures are only logged.
    pub async fn resolve(
        &self,
        cep: &Cep,
        cache: &mut CoordinateCache,
    ) -> Result<CoordinateRecord, LookupError> {
        match self.registry.lookup(cep).await {
            Ok(address) => {
                let query = address.to_query();
                match self.geocode_cached(&query, cache).await {
                    Ok(point) => {
                        return Ok(CoordinateRecord::new(point, CoordinateSource::LiveGeocode))
                    }
                    Err(e) => {
                        tracing::debug!(
                            cep = %cep,
                            query = %query,
                            service = self.geocoder.name(),
                            error = %e,
                            "Street address not geocoded, trying generic query"
                        );
                    }
                }
            }
            Err(e) => {
                tracing::debug!(
                    cep = %cep,
                    service = self.registry.name(),
                    error = %e,
                    "Postal registry lookup failed, trying generic query"
                );
            }
        }

        let query = self.region.generic_query(cep.as_str());
        let point = self.geocode_cached(&query, cache).await?;
        Ok(CoordinateRecord::new(point, CoordinateSource::LiveGeocode))
    }

    async fn geocode_cached(
        &self,
        query: &str,
        cache: &mut CoordinateCache,
    ) -> Result<GeoPoint, LookupError> {
        let key = address_cache_key(query);
        if let Some(point) = cache.address(&key) {
            tracing::debug!(query = %query, key = %key, "Address cache hit");
            return Ok(point);
        }

        let point = self.geocoder.search(query).await?;
        cache.put_address(key, point);
        Ok(point)
    }
}

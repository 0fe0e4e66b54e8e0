//! Service traits for the external lookups
//!
//! The geocoding client only talks to these traits, so the HTTP adapters can
//! be swapped for in-memory fakes in tests.

use crate::domain::{Cep, GeoPoint, LookupError};
use async_trait::async_trait;

/// Structured address returned by a postal registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostalAddress {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

impl PostalAddress {
    /// Free-text query: the non-empty parts, comma-joined in
    /// street, neighborhood, city, state order
    pub fn to_query(&self) -> String {
        [
            self.street.as_str(),
            self.neighborhood.as_str(),
            self.city.as_str(),
            self.state.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Postal-registry lookup keyed by CEP
#[async_trait]
pub trait PostalRegistry: Send + Sync {
    /// Look up the address for a CEP
    ///
    /// # Errors
    ///
    /// Any failure (transport, status, unknown CEP, missing street) is a
    /// [`LookupError`]; callers treat it as "no data".
    async fn lookup(&self, cep: &Cep) -> Result<PostalAddress, LookupError>;

    /// Service name for logs
    fn name(&self) -> &'static str;
}

/// Free-text geocoding search returning the single best match
#[async_trait]
pub trait GeocodingService: Send + Sync {
    /// Geocode a free-text query
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NoCandidates`] for an empty result set and
    /// other [`LookupError`] variants for service failures.
    async fn search(&self, query: &str) -> Result<GeoPoint, LookupError>;

    /// Service name for logs
    fn name(&self) -> &'static str;
}

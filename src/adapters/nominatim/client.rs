//! Nominatim HTTP client

use super::models::NominatimPlace;
use crate::adapters::traits::GeocodingService;
use crate::config::GeocoderConfig;
use crate::domain::{GeoError, GeoPoint, LookupError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, ClientBuilder};

const SERVICE: &str = "nominatim";

/// Geocoding-search client for the Nominatim `/search` endpoint
///
/// Requests a single best match (`limit=1`) and sends the configured
/// User-Agent on every call.
pub struct NominatimClient {
    search_url: String,
    client: Client,
}

impl NominatimClient {
    /// Build a client with the configured timeout and User-Agent
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Configuration`] if the User-Agent is not a valid
    /// header value or the HTTP client cannot be built
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent).map_err(|e| {
            GeoError::Configuration(format!("Invalid geocoder.user_agent: {e}"))
        })?;
        headers.insert(USER_AGENT, agent);

        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .build()
            .map_err(|e| GeoError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
            client,
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }
}

#[async_trait]
impl GeocodingService for NominatimClient {
    async fn search(&self, query: &str) -> std::result::Result<GeoPoint, LookupError> {
        tracing::trace!(query = %query, "Querying geocoding service");

        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| LookupError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let places: Vec<NominatimPlace> =
            response
                .json()
                .await
                .map_err(|e| LookupError::Malformed {
                    service: SERVICE,
                    message: e.to_string(),
                })?;

        let best = places
            .first()
            .ok_or_else(|| LookupError::NoCandidates(query.to_string()))?;

        best.point().ok_or_else(|| LookupError::Malformed {
            service: SERVICE,
            message: format!("unparseable coordinates in candidate for '{query}'"),
        })
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}

//! ViaCEP HTTP client

use super::models::ViaCepResponse;
use crate::adapters::traits::{PostalAddress, PostalRegistry};
use crate::config::PostalRegistryConfig;
use crate::domain::{Cep, GeoError, LookupError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};

const SERVICE: &str = "viacep";

/// Postal-registry client for the ViaCEP REST API
///
/// # Example
///
/// ```no_run
/// use cepgeo::adapters::traits::PostalRegistry;
/// use cepgeo::adapters::viacep::ViaCepClient;
/// use cepgeo::config::PostalRegistryConfig;
/// use cepgeo::domain::Cep;
///
/// # async fn example() -> cepgeo::domain::Result<()> {
/// let client = ViaCepClient::new(&PostalRegistryConfig::default())?;
/// let cep = Cep::parse("64000-020").unwrap();
/// if let Ok(address) = client.lookup(&cep).await {
///     println!("{}", address.to_query());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ViaCepClient {
    base_url: String,
    client: Client,
}

impl ViaCepClient {
    /// Build a client with the configured timeout
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Configuration`] if the HTTP client cannot be built
    pub fn new(config: &PostalRegistryConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .build()
            .map_err(|e| GeoError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn lookup_url(&self, cep: &Cep) -> String {
        format!("{}/{}/json/", self.base_url, cep.as_str())
    }
}

#[async_trait]
impl PostalRegistry for ViaCepClient {
    async fn lookup(&self, cep: &Cep) -> std::result::Result<PostalAddress, LookupError> {
        let url = self.lookup_url(cep);
        tracing::trace!(url = %url, "Querying postal registry");

        let response = self
            .client
            .get(&url)
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

        let body: ViaCepResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Malformed {
                service: SERVICE,
                message: e.to_string(),
            })?;

        body.into_address(cep)
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_url_trims_trailing_slash() {
        let config = PostalRegistryConfig {
            base_url: "https://viacep.com.br/ws/".to_string(),
            timeout_seconds: 10,
        };
        let client = ViaCepClient::new(&config).unwrap();
        let cep = Cep::parse("64049-999").unwrap();
        assert_eq!(
            client.lookup_url(&cep),
            "https://viacep.com.br/ws/64049999/json/"
        );
    }
}

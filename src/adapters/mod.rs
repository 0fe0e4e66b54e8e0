//! External service integrations.
//!
//! - [`traits`] - [`PostalRegistry`](traits::PostalRegistry) and
//!   [`GeocodingService`](traits::GeocodingService), the seams used by the core
//! - [`viacep`] - ViaCEP postal-registry client
//! - [`nominatim`] - Nominatim geocoding-search client
//!
//! # Design Pattern
//!
//! Adapters isolate the HTTP transport behind async traits. Every failure is
//! reported as a [`LookupError`](crate::domain::LookupError) and never panics
//! or aborts the batch.
//!
//! ```rust,no_run
//! use cepgeo::adapters::nominatim::NominatimClient;
//! use cepgeo::adapters::traits::GeocodingService;
//! use cepgeo::config::GeocoderConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = NominatimClient::new(&GeocoderConfig::default())?;
//! let point = client.search("Teresina, PI, Brasil, CEP 64000020").await?;
//! println!("{}, {}", point.lat, point.lon);
//! # Ok(())
//! # }
//! ```

pub mod nominatim;
pub mod traits;
pub mod viacep;

pub use traits::{GeocodingService, PostalAddress, PostalRegistry};

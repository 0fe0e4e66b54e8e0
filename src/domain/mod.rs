//! Domain models and types.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Normalized postal codes** ([`Cep`])
//! - **Coordinate values** ([`CoordinateRecord`], [`AddressCacheEntry`], [`CacheValue`])
//! - **Error types** ([`GeoError`], [`LookupError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use cepgeo::domain::{Cep, CoordinateRecord, CoordinateSource, GeoPoint};
//!
//! let cep = Cep::parse("64.049-999").unwrap();
//! let record = CoordinateRecord::new(GeoPoint::new(-5.0781, -42.7842), CoordinateSource::FallbackByPrefix);
//! assert_eq!(cep.prefix(), "6404");
//! assert!(record.source.is_fallback());
//! ```

pub mod cep;
pub mod coordinate;
pub mod errors;
pub mod result;

pub use cep::Cep;
pub use coordinate::{AddressCacheEntry, CacheValue, CoordinateRecord, CoordinateSource, GeoPoint};
pub use errors::{GeoError, LookupError};
pub use result::Result;

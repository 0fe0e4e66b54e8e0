//! CEP resolution: live geocoding and prefix fallback

pub mod client;
pub mod fallback;

pub use client::{address_cache_key, GeocodingClient};
pub use fallback::FallbackResolver;

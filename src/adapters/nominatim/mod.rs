//! Nominatim geocoding-search adapter

pub mod client;
pub mod models;

pub use client::NominatimClient;
pub use models::NominatimPlace;

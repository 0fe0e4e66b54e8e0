//! ViaCEP postal-registry adapter

pub mod client;
pub mod models;

pub use client::ViaCepClient;
pub use models::ViaCepResponse;

// Persistent coordinate cache

pub mod store;

pub use store::{write_mapping, CacheStats, CacheStore, CoordinateCache, ADDRESS_KEY_PREFIX};

//! Coordinate cache and its file store
//!
//! The cache is one flat JSON object. CEP keys map to
//! `{lat, lon, source}`, `addr_<hash>` keys map to `{lat, lon}`, and older
//! files may contain `null` negative entries. The whole mapping is loaded at
//! start and rewritten on every flush.

use crate::domain::{
    AddressCacheEntry, CacheValue, Cep, CoordinateRecord, CoordinateSource, GeoError, GeoPoint,
    Result,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Namespace for address-cache keys
pub const ADDRESS_KEY_PREFIX: &str = "addr_";

/// In-memory CEP/address → coordinate mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinateCache {
    entries: BTreeMap<String, Option<CacheValue>>,
}

impl CoordinateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys, negative entries included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value stored under `key`; negative entries read as absent
    pub fn get(&self, key: &str) -> Option<&CacheValue> {
        self.entries.get(key).and_then(Option::as_ref)
    }

    /// Stores a value, replacing whatever was under `key`
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<CacheValue>) {
        self.entries.insert(key.into(), Some(value.into()));
    }

    /// Resolved record for a CEP
    pub fn coordinate(&self, cep: &Cep) -> Option<&CoordinateRecord> {
        self.get(cep.as_str()).and_then(CacheValue::as_coordinate)
    }

    pub fn put_coordinate(&mut self, cep: &Cep, record: CoordinateRecord) {
        self.put(cep.as_str(), record);
    }

    /// Point stored under an address key
    pub fn address(&self, key: &str) -> Option<GeoPoint> {
        match self.get(key) {
            Some(CacheValue::Address(entry)) => Some((*entry).into()),
            _ => None,
        }
    }

    pub fn put_address(&mut self, key: impl Into<String>, point: GeoPoint) {
        self.put(key, AddressCacheEntry::from(point));
    }

    /// CEP → record mapping with address and negative entries stripped
    pub fn cleaned_mapping(&self) -> BTreeMap<String, CoordinateRecord> {
        self.entries
            .iter()
            .filter(|(key, _)| !key.starts_with(ADDRESS_KEY_PREFIX))
            .filter_map(|(key, value)| {
                value
                    .as_ref()
                    .and_then(CacheValue::as_coordinate)
                    .map(|record| (key.clone(), *record))
            })
            .collect()
    }

    /// Re-keys CEP entries under their normalized form
    ///
    /// Files written from float CEP columns hold keys like `64049999.0`.
    /// When two keys normalize to the same CEP the first non-null value wins.
    fn normalize_keys(self) -> Self {
        let mut entries: BTreeMap<String, Option<CacheValue>> = BTreeMap::new();

        for (key, value) in self.entries {
            let key = if key.starts_with(ADDRESS_KEY_PREFIX) {
                key
            } else {
                Cep::parse(&key).map(Cep::into_inner).unwrap_or(key)
            };

            match entries.get_mut(&key) {
                Some(existing) => {
                    if existing.is_none() {
                        *existing = value;
                    }
                }
                None => {
                    entries.insert(key, value);
                }
            }
        }

        Self { entries }
    }

    /// Entry counts by kind and source
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            total_entries: self.entries.len(),
            ..Default::default()
        };

        for (key, value) in &self.entries {
            match value {
                None => stats.negative_entries += 1,
                Some(CacheValue::Address(_)) => stats.address_entries += 1,
                Some(CacheValue::Coordinate(_)) if key.starts_with(ADDRESS_KEY_PREFIX) => {
                    stats.address_entries += 1
                }
                Some(CacheValue::Coordinate(record)) => match record.source {
                    CoordinateSource::LiveGeocode => stats.live_geocode += 1,
                    CoordinateSource::FallbackByPrefix => stats.fallback_by_prefix += 1,
                    CoordinateSource::FallbackGeneral => stats.fallback_general += 1,
                },
            }
        }

        stats
    }
}

/// Cache composition summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub live_geocode: usize,
    pub fallback_by_prefix: usize,
    pub fallback_general: usize,
    pub address_entries: usize,
    pub negative_entries: usize,
}

impl CacheStats {
    /// CEPs holding a usable coordinate
    pub fn resolved_ceps(&self) -> usize {
        self.live_geocode + self.fallback_by_prefix + self.fallback_general
    }
}

/// File-backed persistence for a [`CoordinateCache`]
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cache file
    ///
    /// Never fails: a missing, unreadable or corrupt file yields an empty
    /// cache and a log event.
    pub fn load(&self) -> CoordinateCache {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "No cache file found, starting empty");
            return CoordinateCache::new();
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read cache file, starting empty"
                );
                return CoordinateCache::new();
            }
        };

        match serde_json::from_str::<CoordinateCache>(&contents) {
            Ok(cache) => {
                let cache = cache.normalize_keys();
                tracing::info!(
                    path = %self.path.display(),
                    entries = cache.len(),
                    "Cache loaded"
                );
                cache
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Cache file is corrupt, starting empty"
                );
                CoordinateCache::new()
            }
        }
    }

    /// Overwrites the cache file with the full mapping
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Cache`] if the file cannot be written
    pub fn save(&self, cache: &CoordinateCache) -> Result<()> {
        write_json_atomic(&self.path, cache)
            .map_err(|e| GeoError::Cache(format!("{}: {e}", self.path.display())))?;
        tracing::debug!(path = %self.path.display(), entries = cache.len(), "Cache saved");
        Ok(())
    }
}

/// Writes the cleaned CEP mapping artifact
///
/// # Errors
///
/// Returns [`GeoError::Output`] if the file cannot be written
pub fn write_mapping(path: &Path, cache: &CoordinateCache) -> Result<usize> {
    let mapping = cache.cleaned_mapping();
    write_json_atomic(path, &mapping)
        .map_err(|e| GeoError::Output(format!("{}: {e}", path.display())))?;
    Ok(mapping.len())
}

/// Pretty-prints `value` to a sibling temp file, then renames it over `path`
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let json = serde_json::to_string_pretty(value)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

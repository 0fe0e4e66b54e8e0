//! Batch orchestrator - drives one geocoding run end to end
//!
//! The orchestrator owns the coordinate cache for the duration of a run:
//! it loads it, resolves every unique CEP that is not cached yet, checkpoints
//! it to disk periodically, and uses it for the enrichment pass.

use crate::adapters::nominatim::NominatimClient;
use crate::adapters::traits::{GeocodingService, PostalRegistry};
use crate::adapters::viacep::ViaCepClient;
use crate::config::GeoConfig;
use crate::core::batch::records::{EnrichedTable, RecordTable};
use crate::core::batch::summary::RunSummary;
use crate::core::cache::{write_mapping, CacheStore, CoordinateCache};
use crate::core::geocode::{FallbackResolver, GeocodingClient};
use crate::domain::{Cep, CoordinateRecord, GeoError, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Result of the resolution and enrichment passes
#[derive(Debug)]
pub struct BatchOutcome {
    pub records: EnrichedTable,
    pub cache: CoordinateCache,
    pub summary: RunSummary,
}

/// Batch orchestrator
pub struct BatchOrchestrator {
    config: GeoConfig,
    client: GeocodingClient,
    fallback: FallbackResolver,
    store: CacheStore,
}

impl BatchOrchestrator {
    /// Creates an orchestrator over the given lookup services
    pub fn new(
        config: GeoConfig,
        registry: Arc<dyn PostalRegistry>,
        geocoder: Arc<dyn GeocodingService>,
    ) -> Self {
        let client = GeocodingClient::new(registry, geocoder, config.region.clone());
        let fallback = FallbackResolver::from_config(&config.region);
        let store = CacheStore::new(config.cache_path());

        Self {
            config,
            client,
            fallback,
            store,
        }
    }

    /// Creates an orchestrator backed by ViaCEP and Nominatim
    pub fn from_config(config: GeoConfig) -> Result<Self> {
        let registry = Arc::new(ViaCepClient::new(&config.postal_registry)?);
        let geocoder = Arc::new(NominatimClient::new(&config.geocoder)?);
        Ok(Self::new(config, registry, geocoder))
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Resolves one CEP; always yields a coordinate
    ///
    /// Live geocoding is tried first. When every tier fails the fallback
    /// resolver answers. The result is not stored in `cache`.
    pub async fn resolve(&self, cep: &Cep, cache: &mut CoordinateCache) -> CoordinateRecord {
        match self.client.resolve(cep, cache).await {
            Ok(record) => {
                crate::log_cep_resolved!(cep, &record);
                record
            }
            Err(reason) => {
                let record = self.fallback.resolve(cep);
                crate::log_cep_fallback!(cep, &record, &reason);
                record
            }
        }
    }

    /// Executes a full run from the configured input file
    ///
    /// Reads the input CSV, resolves and enriches it, then writes the
    /// enriched CSV and the cleaned mapping.
    ///
    /// # Errors
    ///
    /// - [`GeoError::InputNotFound`] if the input file is missing; checked
    ///   before anything else happens
    /// - [`GeoError::Input`]/[`GeoError::Csv`] for unusable input
    /// - [`GeoError::Output`] if the enriched CSV or the mapping cannot be written
    pub async fn run(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let input_path = Path::new(&self.config.input.csv_path);
        if !input_path.exists() {
            return Err(GeoError::InputNotFound(input_path.display().to_string()));
        }

        tracing::info!(
            input = %input_path.display(),
            output = %self.config.output.csv_path,
            cache = %self.store.path().display(),
            "Starting geocoding run"
        );

        let table = RecordTable::read(input_path, &self.config.input.cep_column)?;
        let outcome = self.process(&table).await?;

        outcome
            .records
            .write(Path::new(&self.config.output.csv_path))?;

        let mapping_path = self.config.mapping_path();
        let mut summary = outcome.summary;
        summary.mapping_entries = write_mapping(&mapping_path, &outcome.cache)?;
        tracing::info!(
            path = %mapping_path.display(),
            entries = summary.mapping_entries,
            "Cleaned mapping written"
        );

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    /// Resolves every unique CEP of `table` and enriches its rows
    ///
    /// The cache file is flushed every `batch.flush_every` resolutions and
    /// once at the end, before the enrichment pass. Flush failures are
    /// counted in the summary but never abort the run.
    pub async fn process(&self, table: &RecordTable) -> Result<BatchOutcome> {
        let start_time = Instant::now();
        let mut summary = RunSummary::new();
        let mut cache = self.store.load();

        let unique = table.unique_ceps();
        summary.total_records = table.len();
        summary.missing_ceps = table.missing_cep_count();
        summary.unique_ceps = unique.len();

        let pending: Vec<&Cep> = unique
            .iter()
            .filter(|cep| self.needs_resolution(&cache, cep))
            .collect();
        summary.cache_hits = unique.len() - pending.len();

        tracing::info!(
            unique_ceps = unique.len(),
            cached = summary.cache_hits,
            pending = pending.len(),
            "Resolving CEPs"
        );

        let batch = &self.config.batch;
        let pause = batch.pause();

        for (index, cep) in pending.iter().enumerate() {
            let record = self.resolve(cep, &mut cache).await;
            if record.source.is_fallback() {
                summary.resolved_fallback += 1;
            } else {
                summary.resolved_live += 1;
            }
            cache.put_coordinate(cep, record);

            let resolved = index + 1;
            if batch.flush_every > 0 && resolved % batch.flush_every == 0 {
                if self.save_cache(&cache) {
                    summary.checkpoints += 1;
                    crate::log_checkpoint!(resolved, pending.len(), cache.len());
                } else {
                    summary.failed_saves += 1;
                }
            }

            let more_pending = resolved < pending.len();
            if more_pending
                && !pause.is_zero()
                && batch.pause_every > 0
                && resolved % batch.pause_every == 0
            {
                tracing::debug!(pause_ms = batch.pause_ms, "Pausing between lookups");
                tokio::time::sleep(pause).await;
            }
        }

        if !self.save_cache(&cache) {
            summary.failed_saves += 1;
        }

        let records = table.enrich(&cache);
        summary.records_enriched = records.enriched_count();

        Ok(BatchOutcome {
            records,
            cache,
            summary: summary.with_duration(start_time.elapsed()),
        })
    }

    /// Flushes the cache; a failed write is logged and the run goes on
    fn save_cache(&self, cache: &CoordinateCache) -> bool {
        match self.store.save(cache) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    path = %self.store.path().display(),
                    error = %e,
                    "Cache flush failed, continuing with in-memory cache"
                );
                false
            }
        }
    }

    fn needs_resolution(&self, cache: &CoordinateCache, cep: &Cep) -> bool {
        match cache.coordinate(cep) {
            None => true,
            Some(record) => self.config.batch.retry_fallbacks && record.source.is_fallback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::traits::PostalAddress;
    use crate::domain::{CoordinateSource, GeoPoint, LookupError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct NoRegistry;

    #[async_trait]
    impl PostalRegistry for NoRegistry {
        async fn lookup(&self, cep: &Cep) -> std::result::Result<PostalAddress, LookupError> {
            Err(LookupError::NotFound(cep.to_string()))
        }

        fn name(&self) -> &'static str {
            "none"
        }
    }

    /// Geocodes only generic queries whose CEP ends in an even digit
    #[derive(Default)]
    struct EvenGeocoder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GeocodingService for EvenGeocoder {
        async fn search(&self, query: &str) -> std::result::Result<GeoPoint, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let last = query.chars().last().and_then(|c| c.to_digit(10)).unwrap_or(1);
            if last % 2 == 0 {
                Ok(GeoPoint::new(-5.0, -42.0))
            } else {
                Err(LookupError::NoCandidates(query.to_string()))
            }
        }

        fn name(&self) -> &'static str {
            "even"
        }
    }

    fn config(dir: &TempDir) -> GeoConfig {
        let mut config = GeoConfig::default();
        config.input.csv_path = dir.path().join("input.csv").display().to_string();
        config.output.csv_path = dir.path().join("output.csv").display().to_string();
        config.batch.pause_ms = 0;
        config
    }

    fn table(ceps: &[&str]) -> RecordTable {
        let csv = std::iter::once("cep".to_string())
            .chain(ceps.iter().map(|c| c.to_string()))
            .collect::<Vec<_>>()
            .join("\n");
        RecordTable::from_reader(csv.as_bytes(), "cep").unwrap()
    }

    #[tokio::test]
    async fn test_resolve_is_total() {
        let dir = TempDir::new().unwrap();
        let orchestrator = BatchOrchestrator::new(
            config(&dir),
            Arc::new(NoRegistry),
            Arc::new(EvenGeocoder::default()),
        );
        let mut cache = CoordinateCache::new();

        let live = orchestrator
            .resolve(&Cep::parse("64000020").unwrap(), &mut cache)
            .await;
        assert_eq!(live.source, CoordinateSource::LiveGeocode);

        let prefix = orchestrator
            .resolve(&Cep::parse("64049999").unwrap(), &mut cache)
            .await;
        assert_eq!(prefix.source, CoordinateSource::FallbackByPrefix);
        assert_eq!((prefix.lat, prefix.lon), (-5.0781, -42.7842));

        let general = orchestrator
            .resolve(&Cep::parse("99999001").unwrap(), &mut cache)
            .await;
        assert_eq!(general.source, CoordinateSource::FallbackGeneral);
        assert_eq!((general.lat, general.lon), (-5.0892, -42.8019));
    }

    #[tokio::test]
    async fn test_process_counts_and_caches() {
        let dir = TempDir::new().unwrap();
        let orchestrator = BatchOrchestrator::new(
            config(&dir),
            Arc::new(NoRegistry),
            Arc::new(EvenGeocoder::default()),
        );

        let outcome = orchestrator
            .process(&table(&["64000020", "64049999", "64000020", ""]))
            .await
            .unwrap();

        assert_eq!(outcome.summary.total_records, 4);
        assert_eq!(outcome.summary.unique_ceps, 2);
        assert_eq!(outcome.summary.missing_ceps, 1);
        assert_eq!(outcome.summary.resolved_live, 1);
        assert_eq!(outcome.summary.resolved_fallback, 1);
        assert_eq!(outcome.summary.records_enriched, 3);
        assert!(orchestrator.store().path().exists());
        assert_eq!(orchestrator.store().load().stats().resolved_ceps(), 2);
    }

    #[tokio::test]
    async fn test_fallback_records_are_final_by_default() {
        let dir = TempDir::new().unwrap();
        let geocoder = Arc::new(EvenGeocoder::default());
        let orchestrator =
            BatchOrchestrator::new(config(&dir), Arc::new(NoRegistry), geocoder.clone());

        orchestrator.process(&table(&["64049999"])).await.unwrap();
        let calls = geocoder.calls.load(Ordering::SeqCst);

        let outcome = orchestrator.process(&table(&["64049999"])).await.unwrap();
        assert_eq!(outcome.summary.cache_hits, 1);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_retry_fallbacks_reattempts_live() {
        let dir = TempDir::new().unwrap();
        let mut cfg = config(&dir);
        cfg.batch.retry_fallbacks = true;

        let geocoder = Arc::new(EvenGeocoder::default());
        let orchestrator = BatchOrchestrator::new(cfg, Arc::new(NoRegistry), geocoder.clone());

        orchestrator.process(&table(&["64049999"])).await.unwrap();
        let calls = geocoder.calls.load(Ordering::SeqCst);

        let outcome = orchestrator.process(&table(&["64049999"])).await.unwrap();
        assert_eq!(outcome.summary.cache_hits, 0);
        assert_eq!(outcome.summary.resolved_fallback, 1);
        assert!(geocoder.calls.load(Ordering::SeqCst) > calls);
    }

    #[tokio::test]
    async fn test_run_requires_input_file() {
        let dir = TempDir::new().unwrap();
        let orchestrator = BatchOrchestrator::new(
            config(&dir),
            Arc::new(NoRegistry),
            Arc::new(EvenGeocoder::default()),
        );

        let result = orchestrator.run().await;
        assert!(matches!(result, Err(GeoError::InputNotFound(_))));
        assert!(!orchestrator.store().path().exists());
    }

    #[tokio::test]
    async fn test_unwritable_cache_does_not_abort_run() {
        let dir = TempDir::new().unwrap();
        let cache_dir = dir.path().join("cache_is_a_dir");
        std::fs::create_dir(&cache_dir).unwrap();

        let mut cfg = config(&dir);
        cfg.output.cache_path = Some(cache_dir.display().to_string());
        cfg.batch.flush_every = 1;
        let orchestrator = BatchOrchestrator::new(
            cfg,
            Arc::new(NoRegistry),
            Arc::new(EvenGeocoder::default()),
        );

        let outcome = orchestrator
            .process(&table(&["64000020", "64049999"]))
            .await
            .unwrap();

        assert_eq!(outcome.summary.checkpoints, 0);
        assert_eq!(outcome.summary.failed_saves, 3);
        assert_eq!(outcome.summary.records_enriched, 2);
        assert!(outcome.records.records().iter().all(|r| r.is_enriched()));
        assert_eq!(outcome.cache.stats().resolved_ceps(), 2);
    }

    async fn paused_run(ceps: usize) -> std::time::Duration {
        let dir = TempDir::new().unwrap();
        let mut cfg = config(&dir);
        cfg.batch.pause_every = 5;
        cfg.batch.pause_ms = 100;
        let orchestrator = BatchOrchestrator::new(
            cfg,
            Arc::new(NoRegistry),
            Arc::new(EvenGeocoder::default()),
        );

        let raw: Vec<String> = (0..ceps).map(|i| format!("6400{i:04}")).collect();
        let refs: Vec<&str> = raw.iter().map(String::as_str).collect();
        let input = table(&refs);

        let start = tokio::time::Instant::now();
        orchestrator.process(&input).await.unwrap();
        start.elapsed()
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_every_five_skips_after_last() {
        let pause = std::time::Duration::from_millis(100);

        assert!(paused_run(4).await < pause);

        let ten = paused_run(10).await;
        assert!(ten >= pause && ten < pause * 2);

        let eleven = paused_run(11).await;
        assert!(eleven >= pause * 2 && eleven < pause * 3);
    }
}

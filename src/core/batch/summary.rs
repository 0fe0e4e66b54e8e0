//! Run summary and reporting

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Summary of one batch run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Input rows read
    pub total_records: usize,

    /// Rows whose CEP value was missing
    pub missing_ceps: usize,

    /// Distinct non-missing CEPs
    pub unique_ceps: usize,

    /// Unique CEPs answered from the cache without resolution
    pub cache_hits: usize,

    /// CEPs resolved through the live services this run
    pub resolved_live: usize,

    /// CEPs that fell back to an approximate coordinate this run
    pub resolved_fallback: usize,

    /// Output rows carrying a coordinate
    pub records_enriched: usize,

    /// Intermediate cache flushes
    pub checkpoints: usize,

    /// Cache flushes that could not be written
    pub failed_saves: usize,

    /// Entries written to the cleaned mapping
    pub mapping_entries: usize,

    pub duration: Duration,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            total_records: 0,
            missing_ceps: 0,
            unique_ceps: 0,
            cache_hits: 0,
            resolved_live: 0,
            resolved_fallback: 0,
            records_enriched: 0,
            checkpoints: 0,
            failed_saves: 0,
            mapping_entries: 0,
            duration: Duration::from_secs(0),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// CEPs resolved this run, live or fallback
    pub fn resolved(&self) -> usize {
        self.resolved_live + self.resolved_fallback
    }

    /// Share of input rows that received a coordinate, as a percentage
    pub fn coverage_rate(&self) -> f64 {
        if self.total_records == 0 {
            return 100.0;
        }
        (self.records_enriched as f64 / self.total_records as f64) * 100.0
    }

    /// Share of this run's resolutions that needed the fallback, as a percentage
    pub fn fallback_rate(&self) -> f64 {
        if self.resolved() == 0 {
            return 0.0;
        }
        (self.resolved_fallback as f64 / self.resolved() as f64) * 100.0
    }

    pub fn log_summary(&self) {
        tracing::info!(
            started_at = %self.started_at.to_rfc3339(),
            total_records = self.total_records,
            unique_ceps = self.unique_ceps,
            cache_hits = self.cache_hits,
            resolved_live = self.resolved_live,
            resolved_fallback = self.resolved_fallback,
            records_enriched = self.records_enriched,
            checkpoints = self.checkpoints,
            duration_secs = self.duration.as_secs(),
            coverage = format!("{:.2}%", self.coverage_rate()),
            "Geocoding run completed"
        );

        if self.failed_saves > 0 {
            tracing::warn!(
                failed_saves = self.failed_saves,
                "Cache could not be persisted; this run's lookups will be repeated next time"
            );
        }

        if self.missing_ceps > 0 {
            tracing::warn!(
                missing_ceps = self.missing_ceps,
                "Rows without a CEP were left without coordinates"
            );
        }
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_summary_creation() {
        let summary = RunSummary::new();
        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.resolved(), 0);
        assert_eq!(summary.duration, Duration::from_secs(0));
    }

    #[test]
    fn test_with_duration() {
        let summary = RunSummary::new().with_duration(Duration::from_secs(90));
        assert_eq!(summary.duration, Duration::from_secs(90));
    }

    #[test]
    fn test_coverage_rate() {
        let mut summary = RunSummary::new();
        assert_eq!(summary.coverage_rate(), 100.0);

        summary.total_records = 200;
        summary.records_enriched = 150;
        assert_eq!(summary.coverage_rate(), 75.0);
    }

    #[test]
    fn test_fallback_rate() {
        let mut summary = RunSummary::new();
        assert_eq!(summary.fallback_rate(), 0.0);

        summary.resolved_live = 3;
        summary.resolved_fallback = 1;
        assert_eq!(summary.resolved(), 4);
        assert_eq!(summary.fallback_rate(), 25.0);
    }
}

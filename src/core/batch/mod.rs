//! Batch geocoding of input records

pub mod orchestrator;
pub mod records;
pub mod summary;

pub use orchestrator::{BatchOrchestrator, BatchOutcome};
pub use records::{
    EnrichedRecord, EnrichedTable, RecordTable, LATITUDE_COLUMN, LONGITUDE_COLUMN, SOURCE_COLUMN,
};
pub use summary::RunSummary;

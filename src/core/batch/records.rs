//! Input records and their enriched output
//!
//! Rows are kept as raw strings so every input column passes through to the
//! output untouched. Only the CEP column is interpreted.

use crate::core::cache::CoordinateCache;
use crate::domain::{Cep, CoordinateRecord, GeoError, Result};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";
pub const SOURCE_COLUMN: &str = "coord_source";

const COORDINATE_COLUMNS: [&str; 3] = [LATITUDE_COLUMN, LONGITUDE_COLUMN, SOURCE_COLUMN];

/// Input table read from CSV
#[derive(Debug, Clone)]
pub struct RecordTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    cep_index: usize,
}

impl RecordTable {
    /// Reads a CSV file with a header row
    ///
    /// # Errors
    ///
    /// - [`GeoError::InputNotFound`] if `path` does not exist
    /// - [`GeoError::Input`] if the header lacks `cep_column`
    /// - [`GeoError::Csv`] for malformed rows
    pub fn read(path: &Path, cep_column: &str) -> Result<Self> {
        if !path.exists() {
            return Err(GeoError::InputNotFound(path.display().to_string()));
        }

        let file = fs::File::open(path)
            .map_err(|e| GeoError::Input(format!("{}: {e}", path.display())))?;
        let table = Self::from_reader(file, cep_column)?;

        tracing::info!(
            path = %path.display(),
            records = table.len(),
            columns = table.headers.len(),
            "Input records loaded"
        );
        Ok(table)
    }

    /// Parses CSV from any reader
    pub fn from_reader<R: io::Read>(reader: R, cep_column: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let cep_index = headers
            .iter()
            .position(|h| h == cep_column)
            .ok_or_else(|| {
                GeoError::Input(format!(
                    "column '{}' not found in header [{}]",
                    cep_column,
                    headers.join(", ")
                ))
            })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self {
            headers,
            rows,
            cep_index,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Normalized CEP of a row, `None` when the value is missing
    pub fn cep_at(&self, row: usize) -> Option<Cep> {
        self.rows
            .get(row)
            .and_then(|values| values.get(self.cep_index))
            .and_then(|raw| Cep::parse(raw))
    }

    /// Distinct non-missing CEPs in first-seen order
    pub fn unique_ceps(&self) -> Vec<Cep> {
        let mut seen = HashSet::new();
        (0..self.rows.len())
            .filter_map(|row| self.cep_at(row))
            .filter(|cep| seen.insert(cep.clone()))
            .collect()
    }

    /// Rows whose CEP value is missing
    pub fn missing_cep_count(&self) -> usize {
        (0..self.rows.len())
            .filter(|&row| self.cep_at(row).is_none())
            .count()
    }

    /// Second pass: copies each row's cached coordinate into the row
    ///
    /// Existing `latitude`, `longitude` and `coord_source` columns are
    /// replaced rather than duplicated.
    pub fn enrich(&self, cache: &CoordinateCache) -> EnrichedTable {
        let keep: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !COORDINATE_COLUMNS.contains(&h.as_str()))
            .map(|(i, _)| i)
            .collect();

        let records = self
            .rows
            .iter()
            .enumerate()
            .map(|(row, values)| {
                let cep = self.cep_at(row);
                let coordinate = cep.as_ref().and_then(|c| cache.coordinate(c)).copied();
                EnrichedRecord {
                    values: keep
                        .iter()
                        .map(|&i| values.get(i).cloned().unwrap_or_default())
                        .collect(),
                    cep,
                    coordinate,
                }
            })
            .collect();

        EnrichedTable {
            headers: keep.iter().map(|&i| self.headers[i].clone()).collect(),
            records,
        }
    }
}

/// Input row with its resolved coordinate, if any
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    /// Pass-through column values
    pub values: Vec<String>,
    pub cep: Option<Cep>,
    pub coordinate: Option<CoordinateRecord>,
}

impl EnrichedRecord {
    pub fn is_enriched(&self) -> bool {
        self.coordinate.is_some()
    }

    fn coordinate_fields(&self) -> [String; 3] {
        match &self.coordinate {
            Some(record) => [
                record.lat.to_string(),
                record.lon.to_string(),
                record.source.to_string(),
            ],
            None => Default::default(),
        }
    }
}

/// Enriched rows plus the pass-through header
#[derive(Debug, Clone)]
pub struct EnrichedTable {
    headers: Vec<String>,
    records: Vec<EnrichedRecord>,
}

impl EnrichedTable {
    /// Output header: pass-through columns followed by the coordinate columns
    pub fn output_headers(&self) -> Vec<String> {
        self.headers
            .iter()
            .cloned()
            .chain(COORDINATE_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn enriched_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_enriched()).count()
    }

    /// Writes the table as CSV to `path`, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Output`] if the file cannot be written
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| GeoError::Output(format!("{}: {e}", dir.display())))?;
        }

        let file = fs::File::create(path)
            .map_err(|e| GeoError::Output(format!("{}: {e}", path.display())))?;
        self.to_writer(file)
            .map_err(|e| GeoError::Output(format!("{}: {e}", path.display())))?;

        tracing::info!(
            path = %path.display(),
            records = self.len(),
            enriched = self.enriched_count(),
            "Enriched CSV written"
        );
        Ok(())
    }

    /// Serializes the table as CSV into any writer
    pub fn to_writer<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(self.output_headers())?;

        for record in &self.records {
            let coordinates = record.coordinate_fields();
            writer.write_record(record.values.iter().chain(coordinates.iter()))?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CoordinateSource, GeoPoint};
    use tempfile::TempDir;

    const SAMPLE: &str = "\
cep,quantidade_vinculos_ativos,ano
64000-020,12,2023
64049999.0,3,2023
,7,2023
64000020,1,2022
nan,2,2022
";

    fn table() -> RecordTable {
        RecordTable::from_reader(SAMPLE.as_bytes(), "cep").unwrap()
    }

    #[test]
    fn test_reads_rows_and_header() {
        let table = table();
        assert_eq!(table.len(), 5);
        assert_eq!(table.headers(), ["cep", "quantidade_vinculos_ativos", "ano"]);
    }

    #[test]
    fn test_unique_ceps_first_seen() {
        let ceps: Vec<String> = table()
            .unique_ceps()
            .into_iter()
            .map(Cep::into_inner)
            .collect();
        assert_eq!(ceps, vec!["64000020", "64049999"]);
        assert_eq!(table().missing_cep_count(), 2);
    }

    #[test]
    fn test_missing_cep_column() {
        let result = RecordTable::from_reader("codigo,ano\n1,2023\n".as_bytes(), "cep");
        assert!(matches!(result, Err(GeoError::Input(_))));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = RecordTable::read(&dir.path().join("absent.csv"), "cep");
        assert!(matches!(result, Err(GeoError::InputNotFound(_))));
    }

    #[test]
    fn test_enrich_fills_known_and_leaves_missing_empty() {
        let mut cache = CoordinateCache::new();
        cache.put_coordinate(
            &Cep::parse("64000020").unwrap(),
            CoordinateRecord::new(GeoPoint::new(-5.0919, -42.8034), CoordinateSource::LiveGeocode),
        );

        let enriched = table().enrich(&cache);
        let flags: Vec<bool> = enriched.records().iter().map(|r| r.is_enriched()).collect();
        assert_eq!(flags, vec![true, false, false, true, false]);
        assert_eq!(enriched.enriched_count(), 2);

        let mut out = Vec::new();
        enriched.to_writer(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "cep,quantidade_vinculos_ativos,ano,latitude,longitude,coord_source"
        );
        assert_eq!(lines[1], "64000-020,12,2023,-5.0919,-42.8034,live_geocode");
        assert_eq!(lines[3], ",7,2023,,,");
    }

    #[test]
    fn test_existing_coordinate_columns_are_replaced() {
        let input = "cep,latitude,ano,longitude\n64049999,0,2023,0\n";
        let table = RecordTable::from_reader(input.as_bytes(), "cep").unwrap();

        let mut cache = CoordinateCache::new();
        cache.put_coordinate(
            &Cep::parse("64049999").unwrap(),
            CoordinateRecord::new(
                GeoPoint::new(-5.0781, -42.7842),
                CoordinateSource::FallbackByPrefix,
            ),
        );

        let enriched = table.enrich(&cache);
        assert_eq!(
            enriched.output_headers(),
            vec!["cep", "ano", "latitude", "longitude", "coord_source"]
        );
        assert_eq!(enriched.records()[0].values, vec!["64049999", "2023"]);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("enriched.csv");
        table().enrich(&CoordinateCache::new()).write(&path).unwrap();
        assert!(path.exists());
    }
}

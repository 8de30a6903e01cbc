use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;

use super::record::cohort_key;
use super::source::{BenchmarkSource, RawAverages, SourceError};

const SECTOR_COLUMN: &str = "sector";
const SIZE_COLUMN: &str = "size_bucket";

#[derive(Debug, thiserror::Error)]
pub enum CsvTableError {
    #[error("benchmark table unreadable: {0}")]
    Csv(#[from] csv::Error),
    #[error("benchmark table is missing the `{0}` column")]
    MissingColumn(&'static str),
}

/// Benchmark table loaded once from CSV.
///
/// Columns are `sector,size_bucket,<metric>...`. Blank or non-numeric cells count as missing
/// so an incomplete row falls back the same way an incomplete remote answer does.
#[derive(Debug, Clone, Default)]
pub struct CsvBenchmarkSource {
    rows: HashMap<String, RawAverages>,
}

impl CsvBenchmarkSource {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CsvTableError> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        Self::from_csv(reader)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CsvTableError> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, CsvTableError> {
        let headers = reader.headers()?.clone();
        let sector_idx = column_index(&headers, SECTOR_COLUMN)?;
        let size_idx = column_index(&headers, SIZE_COLUMN)?;

        let mut rows = HashMap::new();
        for record in reader.records() {
            let record = record?;
            let sector = record.get(sector_idx).unwrap_or_default();
            let size_bucket = record.get(size_idx).unwrap_or_default();

            let averages: RawAverages = headers
                .iter()
                .zip(record.iter())
                .enumerate()
                .filter(|(idx, _)| *idx != sector_idx && *idx != size_idx)
                .filter_map(|(_, (metric, cell))| {
                    cell.parse::<f64>()
                        .ok()
                        .filter(|value| value.is_finite())
                        .map(|value| (metric, value))
                })
                .collect();

            rows.insert(cohort_key(sector, size_bucket), averages);
        }

        Ok(Self { rows })
    }

    pub fn cohort_count(&self) -> usize {
        self.rows.len()
    }
}

fn column_index(headers: &csv::StringRecord, name: &'static str) -> Result<usize, CsvTableError> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or(CsvTableError::MissingColumn(name))
}

#[async_trait]
impl BenchmarkSource for CsvBenchmarkSource {
    async fn fetch_averages(
        &self,
        sector: &str,
        size_bucket: &str,
    ) -> Result<RawAverages, SourceError> {
        self.rows
            .get(&cohort_key(sector, size_bucket))
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                sector: sector.to_string(),
                size_bucket: size_bucket.to_string(),
            })
    }
}

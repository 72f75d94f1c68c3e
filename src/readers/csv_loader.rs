use crate::error::{ProcessingError, Result};
use crate::models::{CountryRow, TableSchema, WideTable};
use crate::processors::normalizer::parse_year_key;
use crate::utils::constants::{
    COUNTRY_COLUMN, DEFAULT_BUFFER_SIZE, ISO2_COLUMN, ISO3_COLUMN, OBJECT_ID_COLUMN,
};
use csv::{StringRecord, Trim};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Loads a wide, header-carrying delimited file into a typed `WideTable`.
///
/// The header is resolved against the four identifier columns and the
/// configured year-column list before any row is parsed, so a schema mismatch
/// aborts the run with no partial work done.
pub struct CsvLoader {
    use_mmap: bool,
}

struct ColumnLayout {
    object_id: usize,
    country: usize,
    iso2: usize,
    iso3: usize,
    year_indices: Vec<usize>,
}

impl CsvLoader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Load the file at `path`, expecting `year_columns` (in order) alongside
    /// the identifier columns. Every other header column must match the
    /// `year_prefix` + 4-digit pattern.
    pub fn load(&self, path: &Path, year_columns: &[String], year_prefix: &str) -> Result<WideTable> {
        if !path.exists() {
            return Err(ProcessingError::SourceNotFound(path.to_path_buf()));
        }

        let (headers, records) = if self.use_mmap {
            let file = File::open(path)?;
            let mmap = unsafe { Mmap::map(&file)? };
            Self::read_records(&mmap[..])?
        } else {
            let file = File::open(path)?;
            Self::read_records(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))?
        };

        debug!(rows = records.len(), columns = headers.len(), "loaded raw records");

        let layout = Self::resolve_layout(&headers, year_columns, year_prefix)?;
        let schema = TableSchema::infer(&headers, records.iter());

        let mut rows = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            // Header occupies line 1; data rows start at 2.
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(idx as u64 + 2);
            rows.push(Self::parse_row(record, &layout, line)?);
        }

        Ok(WideTable {
            schema,
            year_columns: year_columns.to_vec(),
            rows,
        })
    }

    fn read_records<R: Read>(reader: R) -> Result<(Vec<String>, Vec<StringRecord>)> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();

        let mut records = Vec::new();
        for record in csv_reader.records() {
            records.push(record?);
        }

        Ok((headers, records))
    }

    /// Map header names to indices. Identifier columns are required by name;
    /// every remaining column must be a well-formed year key, and every
    /// configured year column must actually be present.
    fn resolve_layout(
        headers: &[String],
        year_columns: &[String],
        year_prefix: &str,
    ) -> Result<ColumnLayout> {
        let find = |name: &str| -> Result<usize> {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                ProcessingError::Config(format!("required column '{}' not found in header", name))
            })
        };

        let object_id = find(OBJECT_ID_COLUMN)?;
        let country = find(COUNTRY_COLUMN)?;
        let iso2 = find(ISO2_COLUMN)?;
        let iso3 = find(ISO3_COLUMN)?;

        let identifier_indices = [object_id, country, iso2, iso3];
        for (idx, header) in headers.iter().enumerate() {
            if identifier_indices.contains(&idx) {
                continue;
            }
            parse_year_key(header, year_prefix)?;
        }

        let mut year_indices = Vec::with_capacity(year_columns.len());
        for name in year_columns {
            let idx = headers.iter().position(|h| h == name).ok_or_else(|| {
                ProcessingError::Config(format!(
                    "year column '{}' not found in header: configured year range does not match the file schema",
                    name
                ))
            })?;
            year_indices.push(idx);
        }

        Ok(ColumnLayout {
            object_id,
            country,
            iso2,
            iso3,
            year_indices,
        })
    }

    fn parse_row(record: &StringRecord, layout: &ColumnLayout, line: u64) -> Result<CountryRow> {
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let object_id_raw = cell(layout.object_id);
        let object_id = object_id_raw.parse::<i64>().map_err(|_| ProcessingError::Parse {
            line,
            message: format!("invalid ObjectId '{}'", object_id_raw),
        })?;

        let country = cell(layout.country).to_string();

        let iso2_raw = cell(layout.iso2);
        let iso2 = if iso2_raw.is_empty() {
            None
        } else {
            Some(iso2_raw.to_string())
        };

        let iso3 = cell(layout.iso3).to_string();

        let mut temperatures = Vec::with_capacity(layout.year_indices.len());
        for &idx in &layout.year_indices {
            let raw = cell(idx);
            if raw.is_empty() {
                temperatures.push(None);
            } else {
                let value = raw.parse::<f64>().map_err(|_| ProcessingError::Parse {
                    line,
                    message: format!("non-numeric measurement '{}' in column {}", raw, idx + 1),
                })?;
                temperatures.push(Some(value));
            }
        }

        Ok(CountryRow::new(object_id, country, iso2, iso3, temperatures))
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn year_columns() -> Vec<String> {
        vec!["F1961".to_string(), "F1962".to_string()]
    }

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_basic_file() -> Result<()> {
        let file = write_csv(
            "ObjectId,Country,ISO2,ISO3,F1961,F1962\n\
             1,Testland,,TST,10.5,\n\
             2,Otherland,OT,OTH,-1.25,3.0\n",
        );

        let loader = CsvLoader::new();
        let table = loader.load(file.path(), &year_columns(), "F")?;

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_year_columns(), 2);

        let first = &table.rows[0];
        assert_eq!(first.object_id, 1);
        assert_eq!(first.country, "Testland");
        assert_eq!(first.iso2, None);
        assert_eq!(first.iso3, "TST");
        assert_eq!(first.temperatures, vec![Some(10.5), None]);

        let second = &table.rows[1];
        assert_eq!(second.iso2.as_deref(), Some("OT"));
        assert_eq!(second.temperatures, vec![Some(-1.25), Some(3.0)]);

        Ok(())
    }

    #[test]
    fn test_inferred_schema() -> Result<()> {
        let file = write_csv(
            "ObjectId,Country,ISO2,ISO3,F1961,F1962\n\
             1,Testland,,TST,10.5,\n",
        );

        let loader = CsvLoader::new();
        let table = loader.load(file.path(), &year_columns(), "F")?;

        let schema = &table.schema;
        assert_eq!(schema.len(), 6);
        assert_eq!(
            schema.column("ObjectId").unwrap().column_type,
            ColumnType::Integer
        );
        assert_eq!(
            schema.column("Country").unwrap().column_type,
            ColumnType::Text
        );
        assert_eq!(
            schema.column("F1961").unwrap().column_type,
            ColumnType::Float
        );
        assert!(schema.column("ISO2").unwrap().nullable);
        assert!(schema.column("F1962").unwrap().nullable);

        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let loader = CsvLoader::new();
        let result = loader.load(Path::new("/no/such/file.csv"), &year_columns(), "F");
        assert!(matches!(result, Err(ProcessingError::SourceNotFound(_))));
    }

    #[test]
    fn test_wrong_year_prefix_is_malformed_key() {
        let file = write_csv(
            "ObjectId,Country,ISO2,ISO3,Year1961,F1962\n\
             1,Testland,,TST,10.5,1.0\n",
        );

        let loader = CsvLoader::new();
        let result = loader.load(file.path(), &year_columns(), "F");
        match result {
            Err(ProcessingError::MalformedYearKey { column, prefix }) => {
                assert_eq!(column, "Year1961");
                assert_eq!(prefix, "F");
            }
            other => panic!("expected MalformedYearKey, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_missing_year_column_is_config_error() {
        let file = write_csv(
            "ObjectId,Country,ISO2,ISO3,F1961\n\
             1,Testland,,TST,10.5\n",
        );

        let loader = CsvLoader::new();
        let result = loader.load(file.path(), &year_columns(), "F");
        assert!(matches!(result, Err(ProcessingError::Config(_))));
    }

    #[test]
    fn test_non_numeric_measurement_is_parse_error() {
        let file = write_csv(
            "ObjectId,Country,ISO2,ISO3,F1961,F1962\n\
             1,Testland,,TST,abc,1.0\n",
        );

        let loader = CsvLoader::new();
        let result = loader.load(file.path(), &year_columns(), "F");
        match result {
            Err(ProcessingError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected Parse error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let file = write_csv(
            "ObjectId,Country,ISO2,ISO3,F1961,F1962\n\
             1,Testland,,TST,10.5\n",
        );

        let loader = CsvLoader::new();
        let result = loader.load(file.path(), &year_columns(), "F");
        assert!(matches!(result, Err(ProcessingError::Csv(_))));
    }

    #[test]
    fn test_mmap_matches_buffered() -> Result<()> {
        let file = write_csv(
            "ObjectId,Country,ISO2,ISO3,F1961,F1962\n\
             1,Testland,,TST,10.5,\n\
             2,Otherland,OT,OTH,-1.25,3.0\n",
        );

        let buffered = CsvLoader::new().load(file.path(), &year_columns(), "F")?;
        let mapped = CsvLoader::with_mmap(true).load(file.path(), &year_columns(), "F")?;

        assert_eq!(buffered.num_rows(), mapped.num_rows());
        for (a, b) in buffered.rows.iter().zip(mapped.rows.iter()) {
            assert_eq!(a.object_id, b.object_id);
            assert_eq!(a.temperatures, b.temperatures);
        }

        Ok(())
    }
}

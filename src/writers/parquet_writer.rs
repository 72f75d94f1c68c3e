use crate::error::{ProcessingError, Result};
use crate::models::TemperatureObservation;
use crate::utils::constants::DEFAULT_ROW_GROUP_SIZE;
use arrow::array::{Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::debug;

/// Writes long-format temperature observations to Parquet.
///
/// The file is produced in a sibling temp file and renamed onto the final
/// path once the footer is written, so a failed run leaves no finished
/// output behind.
pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            "snappy" => Compression::SNAPPY,
            "gzip" => Compression::GZIP(GzipLevel::default()),
            "lz4" => Compression::LZ4,
            "zstd" => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            "none" => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write observations to a Parquet file in one batch.
    pub fn write_observations(
        &self,
        observations: &[TemperatureObservation],
        path: &Path,
    ) -> Result<()> {
        self.write_observations_batched(observations, path, observations.len().max(1))
    }

    /// Write observations in batches for memory efficiency. An empty input
    /// still produces a valid schema-only file.
    pub fn write_observations_batched(
        &self,
        observations: &[TemperatureObservation],
        path: &Path,
        batch_size: usize,
    ) -> Result<()> {
        let schema = self.create_schema();

        let dest_err = |message: String| ProcessingError::DestinationWrite {
            path: path.to_path_buf(),
            message,
        };

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let temp_file = NamedTempFile::new_in(parent).map_err(|e| dest_err(e.to_string()))?;

        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(temp_file, schema.clone(), Some(props))
            .map_err(|e| dest_err(e.to_string()))?;

        for chunk in observations.chunks(batch_size.max(1)) {
            let batch = self.observations_to_batch(chunk, schema.clone())?;
            writer.write(&batch).map_err(|e| dest_err(e.to_string()))?;
        }

        // Finishes the footer and hands the temp file back for the rename.
        let temp_file = writer.into_inner().map_err(|e| dest_err(e.to_string()))?;
        temp_file
            .persist(path)
            .map_err(|e| dest_err(e.to_string()))?;

        debug!(
            observations = observations.len(),
            path = %path.display(),
            "parquet write complete"
        );

        Ok(())
    }

    /// Arrow schema for the long-format output
    fn create_schema(&self) -> Arc<Schema> {
        let fields = vec![
            Field::new("ObjectId", DataType::Int64, false),
            Field::new("Country", DataType::Utf8, false),
            Field::new("ISO3", DataType::Utf8, false),
            Field::new("Year", DataType::Int32, false),
            Field::new("Temperature", DataType::Float64, true),
        ];

        Arc::new(Schema::new(fields))
    }

    /// Convert observations to an Arrow RecordBatch
    fn observations_to_batch(
        &self,
        observations: &[TemperatureObservation],
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let object_ids: Vec<i64> = observations.iter().map(|o| o.object_id).collect();
        let countries: Vec<String> = observations.iter().map(|o| o.country.clone()).collect();
        let iso3s: Vec<String> = observations.iter().map(|o| o.iso3.clone()).collect();
        let years: Vec<i32> = observations.iter().map(|o| o.year).collect();
        let temperatures: Vec<Option<f64>> = observations.iter().map(|o| o.temperature).collect();

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(object_ids)),
                Arc::new(StringArray::from(countries)),
                Arc::new(StringArray::from(iso3s)),
                Arc::new(Int32Array::from(years)),
                Arc::new(Float64Array::from(temperatures)),
            ],
        )?;

        Ok(batch)
    }

    /// Read sample observations back from a Parquet file
    pub fn read_sample_observations(
        &self,
        path: &Path,
        limit: usize,
    ) -> Result<Vec<TemperatureObservation>> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        if limit == 0 {
            return Ok(Vec::new());
        }

        let file = File::open(path)?;
        let parquet_reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(limit.clamp(1, 8192))
            .build()?;

        let column_err =
            |name: &str| ProcessingError::Config(format!("Invalid {} column type", name));

        let mut observations = Vec::new();

        for batch_result in parquet_reader {
            let batch = batch_result?;

            let object_ids = batch
                .column(0)
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| column_err("ObjectId"))?;
            let countries = batch
                .column(1)
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| column_err("Country"))?;
            let iso3s = batch
                .column(2)
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| column_err("ISO3"))?;
            let years = batch
                .column(3)
                .as_any()
                .downcast_ref::<Int32Array>()
                .ok_or_else(|| column_err("Year"))?;
            let temperatures = batch
                .column(4)
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| column_err("Temperature"))?;

            for i in 0..batch.num_rows() {
                observations.push(TemperatureObservation::new(
                    object_ids.value(i),
                    countries.value(i).to_string(),
                    iso3s.value(i).to_string(),
                    years.value(i),
                    if temperatures.is_null(i) {
                        None
                    } else {
                        Some(temperatures.value(i))
                    },
                ));

                if observations.len() >= limit {
                    return Ok(observations);
                }
            }
        }

        Ok(observations)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let mut row_group_sizes = Vec::new();
        for i in 0..row_groups {
            let rg_metadata = metadata.row_group(i);
            row_group_sizes.push(rg_metadata.num_rows());
        }

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0, // Convert to MB
            self.compression,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn observation(object_id: i64, year: i32, temperature: Option<f64>) -> TemperatureObservation {
        TemperatureObservation::new(
            object_id,
            "Testland".to_string(),
            "TST".to_string(),
            year,
            temperature,
        )
    }

    #[test]
    fn test_write_and_read_back() -> Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.parquet");

        let writer = ParquetWriter::new();
        let observations = vec![
            observation(1, 1961, Some(10.5)),
            observation(1, 1962, None),
            observation(2, 1961, Some(-3.25)),
        ];

        writer.write_observations(&observations, &path)?;

        let read_back = writer.read_sample_observations(&path, 10)?;
        assert_eq!(read_back, observations);

        let info = writer.get_file_info(&path)?;
        assert_eq!(info.total_rows, 3);

        Ok(())
    }

    #[test]
    fn test_empty_write_is_schema_only_file() -> Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.parquet");

        let writer = ParquetWriter::new();
        writer.write_observations(&[], &path)?;

        assert!(path.exists());
        let info = writer.get_file_info(&path)?;
        assert_eq!(info.total_rows, 0);

        Ok(())
    }

    #[test]
    fn test_batched_write_preserves_order() -> Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("batched.parquet");

        let observations: Vec<TemperatureObservation> = (0..25)
            .map(|i| observation(i, 1961 + (i % 5) as i32, Some(i as f64)))
            .collect();

        let writer = ParquetWriter::new();
        writer.write_observations_batched(&observations, &path, 7)?;

        let read_back = writer.read_sample_observations(&path, 25)?;
        assert_eq!(read_back, observations);

        Ok(())
    }

    #[test]
    fn test_different_compressions() -> Result<()> {
        let compressions = ["snappy", "gzip", "lz4", "zstd", "none"];

        for compression in &compressions {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("out.parquet");

            let writer = ParquetWriter::new().with_compression(compression)?;
            let result = writer.write_observations(&[observation(1, 1961, Some(1.0))], &path);
            assert!(result.is_ok(), "Failed with compression: {}", compression);
        }

        Ok(())
    }

    #[test]
    fn test_unsupported_compression() {
        let result = ParquetWriter::new().with_compression("brotli9000");
        assert!(matches!(result, Err(ProcessingError::Config(_))));
    }

    #[test]
    fn test_failed_write_leaves_no_output() {
        let writer = ParquetWriter::new();
        let path = Path::new("/nonexistent-dir/out.parquet");

        let result = writer.write_observations(&[observation(1, 1961, Some(1.0))], path);
        assert!(matches!(
            result,
            Err(ProcessingError::DestinationWrite { .. })
        ));
        assert!(!path.exists());
    }
}

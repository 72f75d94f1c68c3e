use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::TemperatureObservation;
use crate::processors::{Cleaner, CleaningReport, Reshaper, YearNormalizer};
use crate::readers::CsvLoader;
use crate::utils::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_END_YEAR, DEFAULT_START_YEAR, YEAR_KEY_PREFIX,
};
use crate::utils::progress::ProgressReporter;
use crate::writers::ParquetWriter;

/// Everything one run needs: source and destination paths, the inclusive
/// year range used to enumerate the expected year columns, and processing
/// knobs.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReshapeConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,

    #[validate(range(min = 1000, max = 9999))]
    pub start_year: i32,

    #[validate(range(min = 1000, max = 9999))]
    pub end_year: i32,

    #[validate(length(min = 1))]
    pub year_prefix: String,

    pub compression: String,
    pub max_workers: usize,
    pub chunk_size: usize,
    pub use_mmap: bool,
}

impl ReshapeConfig {
    pub fn new(input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            input_path,
            output_path,
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            year_prefix: YEAR_KEY_PREFIX.to_string(),
            compression: "snappy".to_string(),
            max_workers: num_cpus::get(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            use_mmap: false,
        }
    }

    pub fn with_year_range(mut self, start_year: i32, end_year: i32) -> Self {
        self.start_year = start_year;
        self.end_year = end_year;
        self
    }

    /// Expected year-column names, in range order.
    pub fn year_columns(&self) -> Vec<String> {
        (self.start_year..=self.end_year)
            .map(|year| format!("{}{}", self.year_prefix, year))
            .collect()
    }

    /// Field validation plus the cross-field checks the derive can't express.
    pub fn ensure_valid(&self) -> Result<()> {
        self.validate()?;

        if self.start_year > self.end_year {
            return Err(ProcessingError::Config(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            )));
        }
        if self.max_workers == 0 {
            return Err(ProcessingError::Config("max_workers must be at least 1".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(ProcessingError::Config("chunk_size must be at least 1".to_string()));
        }

        Ok(())
    }
}

/// Counts from a completed run, one entry per stage that changed anything.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub cleaning: CleaningReport,
    pub year_columns: usize,
    pub observations_written: usize,
    pub output_path: PathBuf,
}

/// The four-stage transform: load, clean, reshape, normalize-and-write.
/// Each stage consumes the previous stage's output and produces a new value;
/// a failure anywhere aborts the run with no output written.
pub struct ReshapePipeline {
    config: ReshapeConfig,
}

impl ReshapePipeline {
    pub fn new(config: ReshapeConfig) -> Result<Self> {
        config.ensure_valid()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReshapeConfig {
        &self.config
    }

    /// Run every stage except the write. Used for validate-only runs and by
    /// `run` itself.
    pub fn run_stages(
        &self,
        progress: Option<&ProgressReporter>,
    ) -> Result<(Vec<TemperatureObservation>, CleaningReport)> {
        let year_columns = self.config.year_columns();

        info!(input = %self.config.input_path.display(), "loading source file");
        let loader = CsvLoader::with_mmap(self.config.use_mmap);
        let table = loader.load(
            &self.config.input_path,
            &year_columns,
            &self.config.year_prefix,
        )?;
        info!(rows = table.num_rows(), "source table loaded");

        let (cleaned, cleaning) = Cleaner::new().clean(table);
        info!(
            iso2_filled = cleaning.iso2_filled,
            rows_dropped = cleaning.rows_dropped,
            "cleaning complete"
        );

        let reshaper = Reshaper::new(self.config.max_workers);
        let stacked = reshaper.unpivot(&cleaned, progress)?;

        let normalizer = YearNormalizer::new(self.config.year_prefix.as_str());
        let observations = normalizer.normalize(stacked)?;
        info!(observations = observations.len(), "reshape complete");

        Ok((observations, cleaning))
    }

    /// Full run including the Parquet write.
    pub fn run(&self, progress: Option<&ProgressReporter>) -> Result<RunSummary> {
        let (observations, cleaning) = self.run_stages(progress)?;

        let writer = ParquetWriter::new().with_compression(&self.config.compression)?;
        writer.write_observations_batched(
            &observations,
            &self.config.output_path,
            self.config.chunk_size,
        )?;
        info!(output = %self.config.output_path.display(), "output written");

        Ok(RunSummary {
            cleaning,
            year_columns: self.config.year_columns().len(),
            observations_written: observations.len(),
            output_path: self.config.output_path.clone(),
        })
    }
}

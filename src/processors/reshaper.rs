use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{CountryRow, StackedObservation, WideTable};
use crate::utils::progress::ProgressReporter;

/// Fan-out unpivot: each wide row yields one stacked row per year column,
/// identifiers repeated verbatim. Missing measurements still emit, carrying a
/// missing temperature.
///
/// The per-row fan-out runs on a rayon pool; the ordered collect keeps
/// derived rows in input-row order, and within one input row the derived
/// rows follow the year-column list.
pub struct Reshaper {
    max_workers: usize,
}

impl Reshaper {
    pub fn new(max_workers: usize) -> Self {
        Self { max_workers }
    }

    pub fn unpivot(
        &self,
        table: &WideTable,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<StackedObservation>> {
        let total_rows = table.rows.len();
        let processed = Arc::new(AtomicUsize::new(0));

        if let Some(p) = progress {
            p.set_message(&format!("Reshaping {} rows...", total_rows));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let nested: Vec<Vec<StackedObservation>> = pool.install(|| {
            table
                .rows
                .par_iter()
                .map(|row| {
                    let derived = Self::fan_out(row, &table.year_columns);

                    let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(p) = progress {
                        p.update(count as u64);
                    }

                    derived
                })
                .collect()
        });

        let observations: Vec<StackedObservation> = nested.into_iter().flatten().collect();

        debug!(
            rows = total_rows,
            year_columns = table.year_columns.len(),
            observations = observations.len(),
            "unpivot complete"
        );

        Ok(observations)
    }

    fn fan_out(row: &CountryRow, year_columns: &[String]) -> Vec<StackedObservation> {
        year_columns
            .iter()
            .zip(row.temperatures.iter())
            .map(|(year_key, temperature)| StackedObservation {
                object_id: row.object_id,
                country: row.country.clone(),
                iso3: row.iso3.clone(),
                year_key: year_key.clone(),
                temperature: *temperature,
            })
            .collect()
    }
}

use serde::Serialize;
use tracing::debug;

use crate::models::WideTable;
use crate::utils::constants::ISO2_SENTINEL;

/// Counts of what the cleaning pass changed.
#[derive(Debug, Clone, Serialize)]
pub struct CleaningReport {
    pub rows_in: usize,
    pub iso2_filled: usize,
    pub rows_dropped: usize,
    pub rows_out: usize,
}

/// Applies the two cleaning rules, in order:
///
/// 1. missing `ISO2` codes are replaced with a sentinel string;
/// 2. rows with no measurement at all are dropped.
///
/// Rows with a partial set of missing measurements are kept; those gaps pass
/// through to the reshape stage untouched.
pub struct Cleaner {
    sentinel: String,
}

impl Cleaner {
    pub fn new() -> Self {
        Self {
            sentinel: ISO2_SENTINEL.to_string(),
        }
    }

    pub fn with_sentinel(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    pub fn clean(&self, table: WideTable) -> (WideTable, CleaningReport) {
        let rows_in = table.rows.len();
        let WideTable {
            schema,
            year_columns,
            mut rows,
        } = table;

        let mut iso2_filled = 0;
        for row in rows.iter_mut() {
            if row.iso2.is_none() {
                row.iso2 = Some(self.sentinel.clone());
                iso2_filled += 1;
            }
        }

        rows.retain(|row| row.has_any_temperature());
        let rows_out = rows.len();
        let rows_dropped = rows_in - rows_out;

        debug!(rows_in, iso2_filled, rows_dropped, "cleaning pass complete");

        let report = CleaningReport {
            rows_in,
            iso2_filled,
            rows_dropped,
            rows_out,
        };

        (
            WideTable {
                schema,
                year_columns,
                rows,
            },
            report,
        )
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

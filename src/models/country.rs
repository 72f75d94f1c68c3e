use serde::{Deserialize, Serialize};

use crate::models::TableSchema;

/// One wide input row: country identifiers plus one measurement slot per
/// configured year column. `temperatures` is index-aligned with the owning
/// table's `year_columns`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryRow {
    pub object_id: i64,
    pub country: String,
    pub iso2: Option<String>,
    pub iso3: String,
    pub temperatures: Vec<Option<f64>>,
}

impl CountryRow {
    pub fn new(
        object_id: i64,
        country: String,
        iso2: Option<String>,
        iso3: String,
        temperatures: Vec<Option<f64>>,
    ) -> Self {
        Self {
            object_id,
            country,
            iso2,
            iso3,
            temperatures,
        }
    }

    /// True if at least one measurement is present.
    pub fn has_any_temperature(&self) -> bool {
        self.temperatures.iter().any(|t| t.is_some())
    }
}

/// The loaded wide table: inferred schema, ordered year-column names, rows.
#[derive(Debug, Clone)]
pub struct WideTable {
    pub schema: TableSchema,
    pub year_columns: Vec<String>,
    pub rows: Vec<CountryRow>,
}

impl WideTable {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_year_columns(&self) -> usize {
        self.year_columns.len()
    }
}

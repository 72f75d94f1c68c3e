use serde::{Deserialize, Serialize};

/// Reshape-stage intermediate: identifiers plus the still-textual year key
/// (e.g. "F1961") and its measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedObservation {
    pub object_id: i64,
    pub country: String,
    pub iso3: String,
    pub year_key: String,
    pub temperature: Option<f64>,
}

/// Final long record, one per (country, year) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureObservation {
    pub object_id: i64,
    pub country: String,
    pub iso3: String,
    pub year: i32,
    pub temperature: Option<f64>,
}

impl TemperatureObservation {
    pub fn new(
        object_id: i64,
        country: String,
        iso3: String,
        year: i32,
        temperature: Option<f64>,
    ) -> Self {
        Self {
            object_id,
            country,
            iso3,
            year,
            temperature,
        }
    }
}

use std::collections::HashMap;

use crate::error::{ProcessingError, Result};
use crate::models::{StackedObservation, TemperatureObservation};
use crate::utils::constants::YEAR_KEY_DIGITS;

/// Parse a year-column name like `F1961` into the integer year.
///
/// The key must be exactly the fixed prefix followed by four ASCII digits.
/// Anything else is a schema mismatch, fatal to the whole run rather than a
/// per-row skip.
pub fn parse_year_key(column: &str, prefix: &str) -> Result<i32> {
    let malformed = || ProcessingError::MalformedYearKey {
        column: column.to_string(),
        prefix: prefix.to_string(),
    };

    let digits = column.strip_prefix(prefix).ok_or_else(malformed)?;
    if digits.len() != YEAR_KEY_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    digits.parse::<i32>().map_err(|_| malformed())
}

/// Converts stacked rows into final long records: the textual year key
/// becomes the integer `Year` column.
pub struct YearNormalizer {
    prefix: String,
}

impl YearNormalizer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn normalize(
        &self,
        stacked: Vec<StackedObservation>,
    ) -> Result<Vec<TemperatureObservation>> {
        // Keys repeat once per input row; parse each distinct key once.
        let mut parsed: HashMap<String, i32> = HashMap::new();

        let mut observations = Vec::with_capacity(stacked.len());
        for obs in stacked {
            let year = match parsed.get(&obs.year_key) {
                Some(year) => *year,
                None => {
                    let year = parse_year_key(&obs.year_key, &self.prefix)?;
                    parsed.insert(obs.year_key.clone(), year);
                    year
                }
            };

            observations.push(TemperatureObservation {
                object_id: obs.object_id,
                country: obs.country,
                iso3: obs.iso3,
                year,
                temperature: obs.temperature,
            });
        }

        Ok(observations)
    }
}

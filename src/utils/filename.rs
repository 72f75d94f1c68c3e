use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Generate default Parquet filename with format: surftemp-long-{YYMMDD}.parquet
pub fn generate_default_parquet_filename() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!("surftemp-long-{:02}{:02}{:02}.parquet", year, month, day);
    PathBuf::from("output").join(filename)
}

/// Identifier column names expected in the source file
pub const OBJECT_ID_COLUMN: &str = "ObjectId";
pub const COUNTRY_COLUMN: &str = "Country";
pub const ISO2_COLUMN: &str = "ISO2";
pub const ISO3_COLUMN: &str = "ISO3";

/// Output column names
pub const YEAR_COLUMN: &str = "Year";
pub const TEMPERATURE_COLUMN: &str = "Temperature";

/// Replacement for missing ISO2 codes
pub const ISO2_SENTINEL: &str = "Unknown";

/// Year column naming: fixed prefix followed by a 4-digit year
pub const YEAR_KEY_PREFIX: &str = "F";
pub const YEAR_KEY_DIGITS: usize = 4;

/// Default configured year range (inclusive)
pub const DEFAULT_START_YEAR: i32 = 1961;
pub const DEFAULT_END_YEAR: i32 = 2022;

/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";

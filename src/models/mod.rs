pub mod country;
pub mod observation;
pub mod schema;

pub use country::{CountryRow, WideTable};
pub use observation::{StackedObservation, TemperatureObservation};
pub use schema::{ColumnDescriptor, ColumnType, TableSchema};

//! Input data: architectures and the record tables they come from.

mod architecture;
mod columns;
mod records;

pub use architecture::{Architecture, ArchitectureRecord, DEFAULT_DELIMITER};
pub use columns::FeatureColumns;
pub(crate) use columns::{column_position, tsv_reader};
pub use records::{RecordTable, REQUIRED_COLUMNS};

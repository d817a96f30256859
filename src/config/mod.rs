#[cfg(feature = "cli")]
pub mod cli;
pub mod field_mapping;

#[cfg(feature = "cli")]
pub use cli::CliArgs;
pub use field_mapping::{ColumnIndices, FieldMapping};

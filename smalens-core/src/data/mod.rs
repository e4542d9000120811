//! Data ingestion: load raw CSV, resolve the schema, clean rows

pub mod clean;
pub mod dates;
pub mod error;
pub mod loader;
pub mod schema;

pub use clean::{normalize_stock, Cleaner};
pub use dates::DateParser;
pub use error::PipelineError;
pub use loader::{Loader, RawTable};
pub use schema::{ColumnMap, RequiredColumn, SchemaError, TableSchema};

//! Domain types for smalens

pub mod record;
pub mod table;

pub use record::{CleanRow, Record};
pub use table::{AggregatedTable, CleanReport, CleanTable};

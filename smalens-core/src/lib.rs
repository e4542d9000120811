//! smalens core: the stock price pipeline behind the SMA viewer.
//!
//! Stages, in data-flow order:
//! - `data`: load a delimited source into a raw string table, resolve the
//!   required columns, clean and sort rows
//! - `aggregate`: trailing 50/200-row simple moving averages over close
//! - `catalog`: category → instrument listings for the selectors
//! - `query`: row subsets for one (category, instrument) pair
//!
//! `pipeline` runs the stages once per source and `cache` memoizes the
//! result per source identity.

pub mod aggregate;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod data;
pub mod domain;
pub mod export;
pub mod fingerprint;
pub mod indicators;
pub mod logging;
pub mod pipeline;
pub mod query;

pub use aggregate::{Aggregator, WindowScope, LONG_WINDOW, SHORT_WINDOW};
pub use cache::TableCache;
pub use catalog::CatalogIndex;
pub use config::{ConfigError, PipelineConfig, ViewerConfig};
pub use data::{PipelineError, RawTable, SchemaError};
pub use domain::{AggregatedTable, CleanReport, CleanTable, Record};
pub use fingerprint::TableFingerprint;
pub use indicators::NullPolicy;
pub use pipeline::{Dataset, Pipeline};
pub use query::{PriceSeries, QueryFacade};

//! The full Loader → Cleaner → Aggregator run, producing a `Dataset`.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::aggregate::Aggregator;
use crate::catalog::CatalogIndex;
use crate::config::{ConfigError, PipelineConfig};
use crate::data::{Cleaner, DateParser, Loader, PipelineError};
use crate::domain::{AggregatedTable, CleanReport};
use crate::fingerprint::TableFingerprint;
use crate::query::QueryFacade;

/// Everything the presentation layer needs from one source, built once.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: PathBuf,
    table: AggregatedTable,
    catalog: CatalogIndex,
    report: CleanReport,
    fingerprint: TableFingerprint,
}

impl Dataset {
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn table(&self) -> &AggregatedTable {
        &self.table
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn report(&self) -> &CleanReport {
        &self.report
    }

    pub fn fingerprint(&self) -> &TableFingerprint {
        &self.fingerprint
    }

    pub fn query(&self) -> QueryFacade<'_> {
        QueryFacade::new(&self.table)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    loader: Loader,
    cleaner: Cleaner,
    aggregator: Aggregator,
}

impl Pipeline {
    pub fn new(loader: Loader, cleaner: Cleaner, aggregator: Aggregator) -> Self {
        Self {
            loader,
            cleaner,
            aggregator,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            Loader::with_delimiter(config.delimiter_byte()?),
            Cleaner::with_date_parser(DateParser::with_formats(config.date_formats.clone())),
            Aggregator::new(config.window_scope, config.null_policy),
        ))
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Run every stage against `source`. The first failure stops the run.
    pub fn run(&self, source: &Path) -> Result<Dataset, PipelineError> {
        let raw = self.loader.load(source)?;
        let clean = self.cleaner.clean(&raw)?;
        let report = *clean.report();
        let table = self.aggregator.aggregate(clean);
        let catalog = CatalogIndex::build(&table);
        let fingerprint = TableFingerprint::of(&table);

        info!(
            source = %source.display(),
            rows = table.len(),
            categories = catalog.category_count(),
            fingerprint = fingerprint.short(),
            "pipeline complete"
        );

        Ok(Dataset {
            source: source.to_path_buf(),
            table,
            catalog,
            report,
            fingerprint,
        })
    }
}

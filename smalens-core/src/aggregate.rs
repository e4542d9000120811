//! Aggregator: appends `sma_50` and `sma_200` to a cleaned table.
//!
//! The scope decides which rows share a window. `Global` runs each SMA over
//! the whole date-ordered table exactly as cleaned, so neighbouring
//! instruments can fall inside one another's window. `PerInstrument` runs it
//! over each stock's own rows while the output keeps the global order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{AggregatedTable, CleanTable, Record};
use crate::indicators::{NullPolicy, Sma};

pub const SHORT_WINDOW: usize = 50;
pub const LONG_WINDOW: usize = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowScope {
    #[default]
    Global,
    PerInstrument,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregator {
    scope: WindowScope,
    null_policy: NullPolicy,
}

impl Aggregator {
    pub fn new(scope: WindowScope, null_policy: NullPolicy) -> Self {
        Self { scope, null_policy }
    }

    pub fn scope(&self) -> WindowScope {
        self.scope
    }

    pub fn null_policy(&self) -> NullPolicy {
        self.null_policy
    }

    pub fn aggregate(&self, table: CleanTable) -> AggregatedTable {
        let (rows, _) = table.into_parts();
        let closes: Vec<Option<f64>> = rows.iter().map(|r| r.close).collect();

        let short = Sma::new(SHORT_WINDOW).with_null_policy(self.null_policy);
        let long = Sma::new(LONG_WINDOW).with_null_policy(self.null_policy);

        let (sma_short, sma_long) = match self.scope {
            WindowScope::Global => (short.compute(&closes), long.compute(&closes)),
            WindowScope::PerInstrument => {
                let groups = group_by_stock(rows.iter().map(|r| r.stock.as_str()));
                debug!(instruments = groups.len(), "partitioned rolling windows");
                (
                    compute_partitioned(&short, &closes, &groups),
                    compute_partitioned(&long, &closes, &groups),
                )
            }
        };

        let records = rows
            .into_iter()
            .zip(sma_short.into_iter().zip(sma_long))
            .map(|(row, (s, l))| Record::from_clean(row, s, l))
            .collect();

        AggregatedTable::new(records)
    }
}

/// Row indices per stock, each list in table order.
fn group_by_stock<'a>(stocks: impl Iterator<Item = &'a str>) -> Vec<Vec<usize>> {
    let mut slot: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (i, stock) in stocks.enumerate() {
        let g = *slot.entry(stock).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[g].push(i);
    }
    groups
}

fn compute_partitioned(sma: &Sma, closes: &[Option<f64>], groups: &[Vec<usize>]) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    for indices in groups {
        let series: Vec<Option<f64>> = indices.iter().map(|&i| closes[i]).collect();
        for (&i, value) in indices.iter().zip(sma.compute(&series)) {
            out[i] = value;
        }
    }
    out
}

/// Aggregate with the default scope and null policy.
pub fn aggregate(table: CleanTable) -> AggregatedTable {
    Aggregator::default().aggregate(table)
}

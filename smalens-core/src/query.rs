//! QueryFacade: read-only row subsets for one (category, instrument) pair.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{AggregatedTable, Record};

#[derive(Debug, Clone, Copy)]
pub struct QueryFacade<'a> {
    table: &'a AggregatedTable,
}

impl<'a> QueryFacade<'a> {
    pub fn new(table: &'a AggregatedTable) -> Self {
        Self { table }
    }

    /// Rows matching both filters exactly, in table (date) order.
    ///
    /// No match is an empty result, never an error.
    pub fn rows_for(&self, category: &str, instrument: &str) -> Vec<&'a Record> {
        self.table
            .iter()
            .filter(|r| r.in_category(category) && r.stock == instrument)
            .collect()
    }

    /// All rows carrying `category`, in table order.
    pub fn rows_in_category(&self, category: &str) -> Vec<&'a Record> {
        self.table.iter().filter(|r| r.in_category(category)).collect()
    }

    /// Column-oriented projection of `rows_for`, the shape a chart consumes.
    pub fn series_for(&self, category: &str, instrument: &str) -> PriceSeries {
        PriceSeries::from_rows(instrument, &self.rows_for(category, instrument))
    }
}

/// Parallel vectors for one instrument: close plus both moving averages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    pub stock: String,
    pub dates: Vec<NaiveDate>,
    pub close: Vec<Option<f64>>,
    pub sma_50: Vec<Option<f64>>,
    pub sma_200: Vec<Option<f64>>,
}

impl PriceSeries {
    pub fn from_rows(stock: &str, rows: &[&Record]) -> Self {
        Self {
            stock: stock.to_string(),
            dates: rows.iter().map(|r| r.date).collect(),
            close: rows.iter().map(|r| r.close).collect(),
            sma_50: rows.iter().map(|r| r.sma_50).collect(),
            sma_200: rows.iter().map(|r| r.sma_200).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Min and max over every present value of the three series.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.close
            .iter()
            .chain(&self.sma_50)
            .chain(&self.sma_200)
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }
}

//! Table types flowing through the pipeline.
//!
//! Both tables are built once and never mutated; views borrow from them.

use serde::{Deserialize, Serialize};

use super::record::{CleanRow, Record};

/// Counters collected while cleaning, kept next to the table for operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReport {
    pub input_rows: usize,
    pub kept_rows: usize,
    pub dropped_invalid_dates: usize,
    pub null_closes: usize,
    pub null_categories: usize,
}

/// Output of the cleaner: valid dates only, sorted by date (stable).
#[derive(Debug, Clone, PartialEq)]
pub struct CleanTable {
    rows: Vec<CleanRow>,
    report: CleanReport,
}

impl CleanTable {
    /// Sorts `rows` by date, keeping the relative order of equal dates.
    pub fn new(mut rows: Vec<CleanRow>, report: CleanReport) -> Self {
        rows.sort_by_key(|r| r.date);
        Self { rows, report }
    }

    pub fn rows(&self) -> &[CleanRow] {
        &self.rows
    }

    pub fn report(&self) -> &CleanReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_parts(self) -> (Vec<CleanRow>, CleanReport) {
        (self.rows, self.report)
    }
}

/// Output of the aggregator: the clean table plus both moving averages.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregatedTable {
    records: Vec<Record>,
}

impl AggregatedTable {
    pub(crate) fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// First and last date of the table, if it has rows.
    pub fn date_range(&self) -> Option<(chrono::NaiveDate, chrono::NaiveDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }
}

impl<'a> IntoIterator for &'a AggregatedTable {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

//! Cleaner: `RawTable` → `CleanTable`.
//!
//! - `Date` is coerced to a calendar date; rows that fail are dropped and logged.
//! - `Stock` loses every whitespace character, not just the ends.
//! - `Category` and `Close` are typed but otherwise left alone; a malformed
//!   close becomes null and stays on the row.
//! - The result is sorted by date, stable.

use tracing::{debug, info, warn};

use super::dates::DateParser;
use super::error::PipelineError;
use super::loader::RawTable;
use super::schema::TableSchema;
use crate::domain::{CleanReport, CleanRow, CleanTable};

/// Cells read as missing in `Category` and `Close`.
const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
    "-",
];

/// Number of rejected date values quoted in the drop warning.
const SAMPLE_LIMIT: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    dates: DateParser,
}

impl Cleaner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_parser(dates: DateParser) -> Self {
        Self { dates }
    }

    /// Type, normalize, filter and sort `raw`.
    ///
    /// Only a schema problem is an error; bad cells are filtered or nulled.
    pub fn clean(&self, raw: &RawTable) -> Result<CleanTable, PipelineError> {
        let columns = TableSchema::resolve(raw.headers())?;

        let mut report = CleanReport {
            input_rows: raw.len(),
            ..CleanReport::default()
        };
        let mut rejected_samples: Vec<&str> = Vec::new();
        let mut rows = Vec::with_capacity(raw.len());

        for cells in raw.rows() {
            let date_cell = cell(cells, columns.date);
            let Some(date) = self.dates.parse(date_cell) else {
                report.dropped_invalid_dates += 1;
                if rejected_samples.len() < SAMPLE_LIMIT {
                    rejected_samples.push(date_cell);
                }
                continue;
            };

            let close_cell = cell(cells, columns.close);
            let close = parse_close(close_cell);
            if close.is_none() {
                report.null_closes += 1;
                if !is_null_token(close_cell) {
                    debug!(value = close_cell, %date, "malformed close nulled");
                }
            }

            let category = parse_category(cell(cells, columns.category));
            if category.is_none() {
                report.null_categories += 1;
            }

            rows.push(CleanRow {
                date,
                stock: normalize_stock(cell(cells, columns.stock)),
                category,
                close,
            });
        }

        report.kept_rows = rows.len();

        if report.dropped_invalid_dates > 0 {
            warn!(
                dropped = report.dropped_invalid_dates,
                samples = ?rejected_samples,
                "dropped rows with unparsable dates"
            );
        }
        if report.null_closes > 0 {
            warn!(nulls = report.null_closes, "rows kept with null close");
        }
        info!(
            input = report.input_rows,
            kept = report.kept_rows,
            "cleaned table"
        );

        Ok(CleanTable::new(rows, report))
    }
}

fn cell(cells: &[String], idx: usize) -> &str {
    cells.get(idx).map(String::as_str).unwrap_or("")
}

/// Remove every whitespace character so "TATA MOTORS" and "TATAMOTORS" collide.
pub fn normalize_stock(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_null_token(raw: &str) -> bool {
    NULL_TOKENS.contains(&raw.trim())
}

fn parse_category(raw: &str) -> Option<String> {
    if is_null_token(raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

fn parse_close(raw: &str) -> Option<f64> {
    if is_null_token(raw) {
        return None;
    }
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Clean `raw` with the default date formats.
pub fn clean(raw: &RawTable) -> Result<CleanTable, PipelineError> {
    Cleaner::new().clean(raw)
}

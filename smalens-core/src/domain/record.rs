//! Row types for the cleaned and aggregated tables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One cleaned row: typed, whitespace-free stock, valid date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRow {
    pub date: NaiveDate,
    pub stock: String,
    pub category: Option<String>,
    pub close: Option<f64>,
}

/// One row of the aggregated table, as handed to presentation.
///
/// `sma_50` and `sma_200` exist on every row. They are `None` only when the
/// window holds no usable close under the active null policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub stock: String,
    pub category: Option<String>,
    pub close: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
}

impl Record {
    pub fn from_clean(row: CleanRow, sma_50: Option<f64>, sma_200: Option<f64>) -> Self {
        Self {
            date: row.date,
            stock: row.stock,
            category: row.category,
            close: row.close,
            sma_50,
            sma_200,
        }
    }

    /// True when the row carries exactly this category (no fuzzy matching).
    pub fn in_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }
}

//! Rendering a selection of records as CSV or JSON text.
//!
//! Column names follow the source convention: `Date,Stock,Category,Close,SMA_50,SMA_200`.
//! Nulls become empty CSV cells and JSON `null`.

use serde::Serialize;
use thiserror::Error;

use crate::domain::Record;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Stock")]
    stock: &'a str,
    #[serde(rename = "Category")]
    category: Option<&'a str>,
    #[serde(rename = "Close")]
    close: Option<f64>,
    #[serde(rename = "SMA_50")]
    sma_50: Option<f64>,
    #[serde(rename = "SMA_200")]
    sma_200: Option<f64>,
}

impl<'a> From<&'a Record> for ExportRow<'a> {
    fn from(r: &'a Record) -> Self {
        Self {
            date: r.date.format("%Y-%m-%d").to_string(),
            stock: &r.stock,
            category: r.category.as_deref(),
            close: r.close,
            sma_50: r.sma_50,
            sma_200: r.sma_200,
        }
    }
}

/// CSV with a header row, even when `rows` is empty.
pub fn to_csv(rows: &[&Record]) -> Result<String, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    wtr.write_record(["Date", "Stock", "Category", "Close", "SMA_50", "SMA_200"])?;
    for row in rows {
        wtr.serialize(ExportRow::from(*row))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Pretty-printed JSON array of row objects.
pub fn to_json(rows: &[&Record]) -> Result<String, ExportError> {
    let out: Vec<ExportRow<'_>> = rows.iter().map(|r| ExportRow::from(*r)).collect();
    Ok(serde_json::to_string_pretty(&out)?)
}

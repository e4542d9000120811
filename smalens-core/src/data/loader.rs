//! Loader: delimited text source → `RawTable`.
//!
//! The raw table is strings all the way down. Typing happens in the cleaner,
//! so the loader only fails when the bytes are not a rectangular table.

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, info};

use super::error::PipelineError;

/// Header pandas-style writers give an unnamed leading index column.
const INDEX_COLUMN_HEADER: &str = "Unnamed: 0";

/// Every column of the source, as text, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    source: PathBuf,
}

impl RawTable {
    /// Build a table directly from headers and rows (used by tests and in-memory sources).
    ///
    /// Rows shorter than the header are padded with empty cells, longer rows truncated.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self {
            headers,
            rows,
            source: PathBuf::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Path the table was read from; empty for in-memory tables.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Drop the first column when it is an unlabeled row-number column.
    fn drop_index_column(&mut self) -> bool {
        let is_index = self
            .headers
            .first()
            .map(|h| is_index_header(h))
            .unwrap_or(false);
        if !is_index {
            return false;
        }
        self.headers.remove(0);
        for row in &mut self.rows {
            if !row.is_empty() {
                row.remove(0);
            }
        }
        true
    }
}

fn is_index_header(header: &str) -> bool {
    let trimmed = header.trim();
    trimmed.is_empty() || trimmed == INDEX_COLUMN_HEADER
}

/// Reads delimited text files into `RawTable`s.
#[derive(Debug, Clone)]
pub struct Loader {
    delimiter: u8,
}

impl Loader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Read `path` into a raw table.
    ///
    /// Fails with `SourceNotFound` when the file does not exist and with
    /// `ParseError` for a missing header row or ragged records.
    pub fn load(&self, path: &Path) -> Result<RawTable, PipelineError> {
        if !path.is_file() {
            return Err(PipelineError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .flexible(false)
            .from_path(path)
            .map_err(|e| PipelineError::parse(path, e))?;

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| PipelineError::parse(path, e))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(PipelineError::parse(path, "no header row"));
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| PipelineError::parse(path, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        let mut table = RawTable {
            headers,
            rows,
            source: path.to_path_buf(),
        };
        if table.drop_index_column() {
            debug!(source = %path.display(), "dropped leading index column");
        }

        info!(
            source = %path.display(),
            rows = table.len(),
            columns = table.headers.len(),
            "loaded raw table"
        );
        Ok(table)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load `path` with the default comma delimiter.
pub fn load(path: &Path) -> Result<RawTable, PipelineError> {
    Loader::new().load(path)
}

//! Required-column schema for the price table.
//!
//! Resolution runs once, right after load, so a missing column is reported
//! as a typed error before any row is touched.

use std::fmt;

/// One of the columns the pipeline cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredColumn {
    Date,
    Stock,
    Category,
    Close,
}

impl RequiredColumn {
    pub const ALL: [RequiredColumn; 4] = [
        RequiredColumn::Date,
        RequiredColumn::Stock,
        RequiredColumn::Category,
        RequiredColumn::Close,
    ];

    /// Canonical header name as it appears in the source files.
    pub fn header(self) -> &'static str {
        match self {
            RequiredColumn::Date => "Date",
            RequiredColumn::Stock => "Stock",
            RequiredColumn::Category => "Category",
            RequiredColumn::Close => "Close",
        }
    }
}

impl fmt::Display for RequiredColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Positions of the required columns within a raw header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub stock: usize,
    pub category: usize,
    pub close: usize,
}

/// Expected schema for the stock price table.
pub struct TableSchema;

impl TableSchema {
    /// Resolve every required column against `headers`.
    ///
    /// Matching is on trimmed names. An exact match wins; otherwise a single
    /// case-insensitive match is accepted. All missing columns are reported
    /// together.
    pub fn resolve(headers: &[String]) -> Result<ColumnMap, SchemaError> {
        let mut missing = Vec::new();
        let mut found = [0usize; 4];

        for (slot, column) in RequiredColumn::ALL.iter().enumerate() {
            match Self::locate(headers, *column)? {
                Some(idx) => found[slot] = idx,
                None => missing.push(column.header().to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns(missing));
        }

        Ok(ColumnMap {
            date: found[0],
            stock: found[1],
            category: found[2],
            close: found[3],
        })
    }

    fn locate(headers: &[String], column: RequiredColumn) -> Result<Option<usize>, SchemaError> {
        let wanted = column.header();

        if let Some(idx) = headers.iter().position(|h| h.trim() == wanted) {
            return Ok(Some(idx));
        }

        let candidates: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.trim().eq_ignore_ascii_case(wanted))
            .map(|(i, _)| i)
            .collect();

        match candidates.as_slice() {
            [] => Ok(None),
            [idx] => Ok(Some(*idx)),
            _ => Err(SchemaError::AmbiguousColumn {
                column: wanted.to_string(),
                candidates: candidates.iter().map(|&i| headers[i].clone()).collect(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("column {column} matches several headers: {}", candidates.join(", "))]
    AmbiguousColumn {
        column: String,
        candidates: Vec<String>,
    },
}

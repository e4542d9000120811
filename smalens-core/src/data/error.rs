//! Structured error types for the ingestion pipeline.
//!
//! Every variant is fatal: the pipeline stops at the first one and the caller
//! decides how to render it. Silent filters (bad dates, malformed closes) are
//! not errors and never surface here.

use std::path::PathBuf;
use thiserror::Error;

use super::schema::SchemaError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("CSV file not found at: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("failed to parse {} as tabular data: {reason}", path.display())]
    ParseError { path: PathBuf, reason: String },

    #[error("schema error: {0}")]
    SchemaError(#[from] SchemaError),
}

impl PipelineError {
    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ParseError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Short machine-friendly tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceNotFound { .. } => "source_not_found",
            Self::ParseError { .. } => "parse_error",
            Self::SchemaError(_) => "schema_error",
        }
    }
}

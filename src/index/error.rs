//! Error types produced while loading and aggregating registry extracts.
//!
//! Every variant carries the path of the offending source so a multi-file
//! load failure is attributable to one file. Errors are fail-fast: any
//! variant aborts the whole aggregation with no partial result.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing, keying, or aggregating extracts.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IndexError {
    /// A source file could not be read into memory.
    #[error("failed to read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited text is malformed (e.g. a row whose field count does
    /// not match the header, or invalid UTF-8 in a field).
    #[error("malformed delimited data in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A data row has no value for the required registration column.
    /// `row` is the 1-based position of the row among the data rows
    /// (the header is not counted).
    #[error("{path}: data row {row} is missing required column '{field}'")]
    MissingField {
        path: PathBuf,
        row: usize,
        field: &'static str,
    },
}

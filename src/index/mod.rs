//! Delimited-text ingestion and keyed aggregation of registry extracts.
//!
//! This is the data backbone of the service: semicolon-delimited extract
//! files are parsed into row records, keyed by registration number, and
//! merged across files into one in-memory index. The module is a plain
//! synchronous library with no dependency on the HTTP layer, configuration,
//! or any process-wide state, so it can be tested and reused on its own.
//!
//! # Pipeline
//!
//! ```text
//! file paths
//!     │  read_to_string (per file)
//!     ▼
//! parse_records        ── text → Vec<Record>, first row is the header
//!     ▼
//! index_by_registration ── Vec<Record> → PerFileIndex (N_REG_NEW → Record)
//!     ▼
//! aggregate_files       ── PerFileIndex per file → AggregateIndex
//!                          (N_REG_NEW → one Record per file, in file order)
//! ```
//!
//! # Failure semantics
//!
//! Every stage is fail-fast: an unreadable file, malformed delimited text,
//! or a row without the registration column aborts the whole aggregation
//! and returns no partial result. Extracts are batch-loaded once at
//! startup, so a broken source is a deployment problem, not something to
//! paper over row by row.
//!
//! # Duplicate registrations
//!
//! Within one file, a later row with the same registration number replaces
//! the earlier one (last write wins). Extracts are expected to be unique
//! per file; this policy is deliberate and covered by tests.

mod error;

pub use error::IndexError;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

/// Column every extract must carry; rows are keyed by its value.
pub const REGISTRATION_FIELD: &str = "N_REG_NEW";

/// One parsed data row: header field name → field value.
pub type Record = HashMap<String, String>;

/// Registration number → the single record one file holds for it.
pub type PerFileIndex = HashMap<String, Record>;

/// Registration number → one record per source file containing it, in
/// file-processing order.
pub type AggregateIndex = HashMap<String, Vec<Record>>;

/// Parses semicolon-delimited text into a sequence of row records.
///
/// The first row is always treated as the header; each data row becomes a
/// map from header field to value. Header-only (or empty) input yields an
/// empty vec. A record never carries more keys than the header has fields,
/// and a row whose field count differs from the header is rejected by the
/// underlying reader.
///
/// `source` is only used to label errors; no I/O happens here.
pub fn parse_records(source: &Path, text: &str) -> Result<Vec<Record>, IndexError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(text.as_bytes());

    let header = reader
        .headers()
        .map_err(|e| IndexError::Parse {
            path: source.to_path_buf(),
            source: e,
        })?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| IndexError::Parse {
            path: source.to_path_buf(),
            source: e,
        })?;
        let record: Record = header
            .iter()
            .zip(row.iter())
            .map(|(field, value)| (field.to_string(), value.to_string()))
            .collect();
        records.push(record);
    }

    debug!(source = %source.display(), rows = records.len(), "parsed extract");
    Ok(records)
}

/// Keys a sequence of records by their registration number.
///
/// Every record must carry a non-empty [`REGISTRATION_FIELD`] value; the
/// first one that does not fails the whole call, returning no partial map.
/// When two rows in the same sequence share a registration number the later
/// row wins.
pub fn index_by_registration(
    source: &Path,
    records: Vec<Record>,
) -> Result<PerFileIndex, IndexError> {
    let mut index = PerFileIndex::with_capacity(records.len());
    for (row, record) in records.into_iter().enumerate() {
        match record.get(REGISTRATION_FIELD).filter(|v| !v.is_empty()) {
            Some(number) => {
                index.insert(number.clone(), record);
            }
            None => {
                return Err(IndexError::MissingField {
                    path: source.to_path_buf(),
                    row: row + 1,
                    field: REGISTRATION_FIELD,
                })
            }
        }
    }
    Ok(index)
}

/// Reads one extract file and returns its per-file index.
pub fn load_file_index(path: &Path) -> Result<PerFileIndex, IndexError> {
    let text = fs::read_to_string(path).map_err(|e| IndexError::File {
        path: path.to_path_buf(),
        source: e,
    })?;
    let records = parse_records(path, &text)?;
    index_by_registration(path, records)
}

/// Loads every named extract, in order, and merges the per-file indexes
/// into one aggregate index.
///
/// For each registration number the aggregate holds at most one record per
/// source file, appended in the order the files were supplied. Any failure
/// on any file aborts the whole merge; nothing loaded from earlier files
/// survives into the result.
pub fn aggregate_files<P: AsRef<Path>>(paths: &[P]) -> Result<AggregateIndex, IndexError> {
    let mut aggregate = AggregateIndex::new();
    for path in paths {
        let per_file = load_file_index(path.as_ref())?;
        for (number, record) in per_file {
            aggregate.entry(number).or_default().push(record);
        }
    }
    info!(
        files = paths.len(),
        registrations = aggregate.len(),
        "aggregated registry extracts"
    );
    Ok(aggregate)
}

/// Serializes records back to semicolon-delimited text under the given
/// header, one row per record in order. Fields absent from a record are
/// written empty.
pub fn to_delimited(header: &[&str], records: &[Record]) -> Result<String, IndexError> {
    let label = Path::new("<in-memory>");
    let parse_err = |e: csv::Error| IndexError::Parse {
        path: label.to_path_buf(),
        source: e,
    };

    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(vec![]);
    writer.write_record(header).map_err(parse_err)?;
    for record in records {
        writer
            .write_record(
                header
                    .iter()
                    .map(|field| record.get(*field).map(String::as_str).unwrap_or("")),
            )
            .map_err(parse_err)?;
    }

    let bytes = writer.into_inner().map_err(|e| IndexError::File {
        path: label.to_path_buf(),
        source: e.into_error(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

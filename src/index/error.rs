use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the efficacy index from tabular sources.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The table file could not be opened or read.
    #[error("failed to read table {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is missing from the ingredient or product table.
    ///
    /// The composite table degrades to an empty map instead of raising this.
    #[error("table {} is missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    /// A record could not be decoded.
    #[error("malformed record in {}: {source}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

use netops_core::ParseOutcomeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("line {line}: expected at most {expected} fields, found {found}")]
    RowLength { line: u64, expected: usize, found: usize },

    #[error("line {line}: required field `{field}` is empty")]
    MissingField { line: u64, field: &'static str },

    #[error("line {line}, column {column:?}: {source}")]
    InvalidOutcome {
        line: u64,
        column: String,
        #[source]
        source: ParseOutcomeError,
    },

    #[error("run has {outcomes} outcomes for {services} services")]
    OutcomeCount { services: usize, outcomes: usize },
}

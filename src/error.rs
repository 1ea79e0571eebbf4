use crate::value::Kind;

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row} has {found} cells but the header only has {expected} columns")]
    ExtraCells {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Column `{0}` appears more than once in the header")]
    DuplicateColumn(String),

    #[error("`{0}` has no data rows")]
    EmptyCsv(PathBuf),

    #[error("Sample record has no `{0}` column to use as hash key")]
    MissingHashKey(String),

    #[error("Hash key `{column}` can not be of type {kind}")]
    InvalidHashKey { column: String, kind: Kind },

    #[error("Row {row} has no value for hash key `{column}`")]
    MissingHashKeyValue { row: usize, column: String },

    #[error("Row {row}, column `{column}`: expected {expected} but got `{value}`")]
    TypeMismatch {
        row: usize,
        column: String,
        expected: Kind,
        value: String,
    },

    #[error("Table `{0}` does not exist")]
    TableNotFound(String),

    #[error("Timeout waiting for table `{0}` to become active")]
    TableActivationTimeout(String),

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("Failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Client(#[from] anyhow::Error),
}

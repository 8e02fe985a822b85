//! Structured output for simulation results: CSV tables and JSON documents.
mod csv;
mod json;

pub use csv::{write_csv, write_matrix_csv, CsvTable};
pub use json::{write_comparison_json, ComparisonDocument};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Could not write report")]
    Io(#[from] std::io::Error),

    #[error("Could not encode report as JSON")]
    Json(#[from] serde_json::Error),

    #[error("Row {row} has {got} values but the header has {expected} columns")]
    RowLength {
        row: usize,
        expected: usize,
        got: usize,
    },
}

pub type Result<T, E = ReportError> = std::result::Result<T, E>;

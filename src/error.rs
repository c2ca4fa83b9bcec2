//! Error types shared by the loader, the processor and the chart export.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("No spreadsheet data found in {}", path.display())]
    MissingDataSource { path: PathBuf },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read spreadsheet {}: {message}", path.display())]
    Spreadsheet { path: PathBuf, message: String },
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Chart rendering failed: {0}")]
    Chart(String),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

use std::path::PathBuf;

use thiserror::Error;

use crate::collector::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid state: {0}")]
    InvalidState(&'static str),
}

pub type AppResult<T> = Result<T, AppError>;

/// Faults inside the export pipeline. These never leave the pipeline; they are
/// logged and turned into a failure notification.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("layout failed: {0}")]
    Layout(String),

    #[error("PDF assembly failed: {0}")]
    Assembly(String),

    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("export task aborted: {0}")]
    Task(String),
}

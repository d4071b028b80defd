// Error handling utilities
// Author: Gabriel Demetrios Lafis

use thiserror::Error;

use crate::api::ApiError;
use crate::chart::ChartError;
use crate::data::DataError;
use crate::processing::ProcessingError;
use crate::storage::StorageError;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Processing error: {0}")]
    Processing(#[from] ProcessingError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for AppError
pub type AppResult<T> = Result<T, AppError>;

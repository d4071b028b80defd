// API module for exposing the analysis engines via HTTP
// Author: Gabriel Demetrios Lafis

mod handlers;
mod models;
mod routes;
mod server;

pub use handlers::*;
pub use models::*;
pub use routes::*;
pub use server::*;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::{error, warn};
use serde_json::json;
use thiserror::Error;

use crate::chart::{ChartError, ChartRenderer};
use crate::data::DataError;
use crate::processing::ProcessingError;
use crate::storage::{DataStorage, StorageError};

/// Dataset registry shared by all workers
pub type SharedStorage = Arc<dyn DataStorage + Send + Sync>;

/// Chart renderer shared by all workers
pub type SharedRenderer = Arc<dyn ChartRenderer + Send + Sync>;

/// Represents an error in the API module
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    DataError(#[from] DataError),
    #[error("{0}")]
    ProcessingError(#[from] ProcessingError),
    #[error("{0}")]
    StorageError(StorageError),
    #[error("{0}")]
    ChartError(#[from] ChartError),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InternalError(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => ApiError::NotFound("File not found".to_string()),
            other => ApiError::StorageError(other),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::DataError(DataError::IoError(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::DataError(_) => StatusCode::BAD_REQUEST,
            ApiError::ProcessingError(err) => match err {
                ProcessingError::ColumnNotFound(_) => StatusCode::NOT_FOUND,
                ProcessingError::Computation(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
            ApiError::StorageError(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::StorageError(_) | ApiError::ChartError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        HttpResponse::build(status).json(json!({ "error": self.to_string() }))
    }
}

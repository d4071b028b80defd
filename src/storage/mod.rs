// Storage module for the dataset registry
// Author: Gabriel Demetrios Lafis

mod memory;
mod cache;

pub use memory::*;
pub use cache::*;

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::data::DataSet;

/// Registry of ingested datasets keyed by an opaque identifier
///
/// Datasets are immutable once stored; `load` hands out shared references.
pub trait DataStorage {
    /// Store a dataset under a name
    fn store(&self, name: &str, data: DataSet) -> Result<(), StorageError>;

    /// Load a dataset
    fn load(&self, name: &str) -> Result<Arc<DataSet>, StorageError>;

    /// Check if a dataset exists
    fn exists(&self, name: &str) -> Result<bool, StorageError>;

    /// Delete a dataset
    fn delete(&self, name: &str) -> Result<(), StorageError>;

    /// List all datasets
    fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Store a dataset under a freshly generated identifier and return it
    fn register(&self, data: DataSet) -> Result<String, StorageError> {
        let id = Uuid::new_v4().to_string();
        self.store(&id, data)?;
        Ok(id)
    }
}

/// Represents an error in the storage module
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Dataset '{0}' not found")]
    NotFound(String),
    #[error("Storage lock poisoned")]
    LockPoisoned,
    #[error("Error: {0}")]
    Other(String),
}

// Memory storage implementation
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::data::DataSet;
use super::{DataStorage, StorageError};

/// Unbounded in-memory storage; datasets live until deleted
pub struct MemoryStorage {
    datasets: RwLock<HashMap<String, Arc<DataSet>>>,
}

impl MemoryStorage {
    /// Create a new memory storage
    pub fn new() -> Self {
        MemoryStorage {
            datasets: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStorage for MemoryStorage {
    fn store(&self, name: &str, data: DataSet) -> Result<(), StorageError> {
        let mut datasets = self.datasets.write().map_err(|_| StorageError::LockPoisoned)?;

        datasets.insert(name.to_string(), Arc::new(data));
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Arc<DataSet>, StorageError> {
        let datasets = self.datasets.read().map_err(|_| StorageError::LockPoisoned)?;

        datasets
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let datasets = self.datasets.read().map_err(|_| StorageError::LockPoisoned)?;

        Ok(datasets.contains_key(name))
    }

    fn delete(&self, name: &str) -> Result<(), StorageError> {
        let mut datasets = self.datasets.write().map_err(|_| StorageError::LockPoisoned)?;

        if datasets.remove(name).is_none() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        let datasets = self.datasets.read().map_err(|_| StorageError::LockPoisoned)?;

        let mut names: Vec<String> = datasets.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

// Configuration utilities
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::storage::{CacheStorage, DataStorage, MemoryStorage};
use super::{validate_range, AppError, AppResult};

/// Default request body limit for uploads (16 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub enable_cors: bool,
    pub max_upload_bytes: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(rename = "type")]
    pub type_: String,
    /// Maximum datasets kept by the `cache` backend
    pub capacity: usize,
    /// Seconds before a cached dataset expires
    pub cache_ttl: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
            enable_cors: true,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            type_: "memory".to_string(),
            capacity: 32,
            cache_ttl: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl ServerConfig {
    /// Worker threads, defaulting to the number of CPUs
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }
}

impl StorageConfig {
    /// Build the dataset registry described by this configuration
    pub fn build(&self) -> AppResult<Arc<dyn DataStorage + Send + Sync>> {
        match self.type_.to_lowercase().as_str() {
            "memory" => Ok(Arc::new(MemoryStorage::new())),
            "cache" => {
                let mut cache = CacheStorage::new(self.capacity);
                if let Some(ttl) = self.cache_ttl {
                    cache = cache.with_ttl(Duration::from_secs(ttl));
                }
                Ok(Arc::new(cache))
            }
            other => Err(AppError::Config(format!("Unknown storage type '{}'", other))),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        let config: Config = match extension {
            "json" => serde_json::from_str(&contents).map_err(|e| AppError::Config(e.to_string()))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| AppError::Config(e.to_string()))?,
            _ => return Err(AppError::Config("Unsupported config file format".to_string())),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check values that would otherwise fail at startup
    pub fn validate(&self) -> AppResult<()> {
        validate_range(self.server.port, 1, u16::MAX, "server.port").map_err(AppError::Config)?;
        validate_range(self.server.max_upload_bytes, 1, usize::MAX, "server.max_upload_bytes")
            .map_err(AppError::Config)?;
        validate_range(self.storage.capacity, 1, usize::MAX, "storage.capacity").map_err(AppError::Config)?;
        Ok(())
    }

    /// Get the log level filter
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }
}

// Rust EDA Service
// Author: Gabriel Demetrios Lafis

//! # Rust EDA Service
//!
//! An exploratory data analysis service written in Rust.
//!
//! ## Features
//!
//! - CSV/TSV/semicolon-delimited uploads with per-column type inference
//! - Descriptive statistics, correlation, distribution and outlier analysis
//! - Missing-value analysis, scatter and pair plots, grouped aggregation
//! - Pluggable chart rendering (SVG by default)
//! - Bounded in-memory dataset registry
//! - REST API for remote access
//!
//! ## Example
//!
//! ```rust
//! use rust_eda_service::{data, processing};
//!
//! let csv = b"age,city\n25,NYC\n30,LA\n25,NYC\n";
//! let dataset = data::parse(csv, "people.csv").unwrap();
//!
//! let report = processing::describe(&dataset);
//! assert_eq!(report.shape.rows, 3);
//! assert_eq!(report.duplicates, 1);
//! assert_eq!(report.duplicate_percentage, 33.33);
//! ```

pub mod api;
pub mod chart;
pub mod data;
pub mod processing;
pub mod storage;
pub mod utils;

// Re-export main types
pub use api::Server;
pub use chart::{ChartRenderer, SvgRenderer};
pub use data::{DataSet, DataType, Field, Row, Schema, Value};
pub use storage::{CacheStorage, DataStorage, MemoryStorage};
pub use utils::Config;

// Processing module for tabular analysis
// Author: Gabriel Demetrios Lafis

//! Analysis engines.
//!
//! Every engine is a pure function of a loaded [`DataSet`] and a few parameters. Results are
//! plain `Serialize` structs; those that carry a chart expose it as a typed
//! [`Chart`](crate::chart::Chart) which the caller may render.

mod aggregate;
mod correlation;
mod describe;
mod distribution;
mod missing;
mod outliers;
mod preview;
mod scatter;
mod stats;

pub use aggregate::*;
pub use correlation::*;
pub use describe::*;
pub use distribution::*;
pub use missing::*;
pub use outliers::*;
pub use preview::*;
pub use scatter::*;
pub use stats::*;

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::data::{DataSet, Value};

/// Represents an error in the processing module
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Column {0} not found")]
    ColumnNotFound(String),
    #[error("Need at least {required} numeric columns{purpose}")]
    InsufficientColumns { required: usize, purpose: String },
    #[error("No numeric columns found")]
    NoNumericColumns,
    #[error("Please provide {0}")]
    MissingParameters(String),
    #[error("Column {0} is not numeric")]
    NotNumeric(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Name to value mapping that serializes as a JSON object in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> ColumnMap<V> {
    /// Create an empty map
    pub fn new() -> Self {
        ColumnMap { entries: Vec::new() }
    }

    /// Insert a value, replacing an existing entry in place
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> Default for ColumnMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for ColumnMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ColumnMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for ColumnMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Round half away from zero to a number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    // Keep -0.0 out of responses
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Round an optional statistic, dropping non-finite results
pub fn round_opt(value: Option<f64>, places: i32) -> Option<f64> {
    value.filter(|v| v.is_finite()).map(|v| round_to(v, places))
}

/// `part / total` as a percentage with two decimals; zero when `total` is zero
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    round_to(part as f64 / total as f64 * 100.0, 2)
}

/// Resolve a column name to its index
pub fn require_column(dataset: &DataSet, name: &str) -> Result<usize, ProcessingError> {
    dataset
        .column_index(name)
        .ok_or_else(|| ProcessingError::ColumnNotFound(name.to_string()))
}

/// Frequencies of the non-null values, most frequent first; ties keep first-appearance order
pub fn value_counts<'a>(values: impl Iterator<Item = &'a Value>) -> Vec<(&'a Value, usize)> {
    let mut positions: HashMap<&Value, usize> = HashMap::new();
    let mut counts: Vec<(&Value, usize)> = Vec::new();

    for value in values.filter(|v| !v.is_null()) {
        match positions.get(value) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                positions.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_map_keeps_insertion_order() {
        let mut map = ColumnMap::new();
        map.insert("b", 1);
        map.insert("a", 2);
        map.insert("b", 3);

        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"b":3,"a":2}"#);
    }

    #[test]
    fn percentage_guards_zero_total() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(round_to(-0.0001, 3), 0.0);
    }

    #[test]
    fn value_counts_break_ties_by_first_appearance() {
        let values = vec![
            Value::String("LA".into()),
            Value::Null,
            Value::String("NYC".into()),
            Value::String("NYC".into()),
            Value::String("SF".into()),
        ];
        let counts = value_counts(values.iter());
        let labels: Vec<String> = counts.iter().map(|(v, _)| v.to_string()).collect();

        assert_eq!(labels, vec!["NYC", "LA", "SF"]);
        assert_eq!(counts[0].1, 2);
    }
}

// Schema inference and construction
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;

use super::{DataType, Field, Schema, Value};

/// Cell texts treated as missing values
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Infers column types from raw cell text
pub struct SchemaInferrer;

impl SchemaInferrer {
    /// Check whether a raw cell denotes a missing value
    pub fn is_na(raw: &str) -> bool {
        NA_VALUES.contains(&raw)
    }

    /// Infer the type of a column from its raw cells
    pub fn infer_type<'a, I>(cells: I) -> DataType
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut all_int = true;
        let mut all_float = true;
        let mut all_bool = true;
        let mut has_null = false;
        let mut has_value = false;

        for raw in cells {
            if Self::is_na(raw) {
                has_null = true;
                continue;
            }

            has_value = true;
            let trimmed = raw.trim();
            if all_int && trimmed.parse::<i64>().is_err() {
                all_int = false;
            }
            if all_float && trimmed.parse::<f64>().is_err() {
                all_float = false;
            }
            if all_bool && parse_bool(trimmed).is_none() {
                all_bool = false;
            }
        }

        match (has_value, all_int, all_float, all_bool) {
            (false, ..) => DataType::Float,
            (true, true, _, _) if has_null => DataType::Float,
            (true, true, _, _) => DataType::Integer,
            (true, false, true, _) => DataType::Float,
            (true, false, false, true) if !has_null => DataType::Boolean,
            _ => DataType::String,
        }
    }

    /// Convert a raw cell into a typed value for a column of the given type
    pub fn convert(raw: &str, data_type: DataType) -> Value {
        if Self::is_na(raw) {
            return Value::Null;
        }

        let trimmed = raw.trim();
        match data_type {
            DataType::Integer => trimmed
                .parse::<i64>()
                .map(Value::Integer)
                .unwrap_or_else(|_| Value::String(raw.to_string())),
            DataType::Float => trimmed
                .parse::<f64>()
                .map(Value::Float)
                .unwrap_or_else(|_| Value::String(raw.to_string())),
            DataType::Boolean => parse_bool(trimmed)
                .map(Value::Boolean)
                .unwrap_or_else(|| Value::String(raw.to_string())),
            DataType::String => Value::String(raw.to_string()),
        }
    }

    /// Make header names non-empty and unique
    ///
    /// Blank names become `Unnamed: <position>`; repeated names get a `.1`, `.2`, ...
    /// suffix in order of appearance.
    pub fn normalize_headers(raw: &[String]) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut names = Vec::with_capacity(raw.len());

        for (i, name) in raw.iter().enumerate() {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name.clone()
            };

            let mut candidate = base.clone();
            let mut suffix = 0;
            while seen.contains(&candidate) {
                suffix += 1;
                candidate = format!("{}.{}", base, suffix);
            }

            seen.insert(candidate.clone());
            names.push(candidate);
        }

        names
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Schema builder for creating schemas
pub struct SchemaBuilder {
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Add a field to the schema
    pub fn add_field(mut self, name: &str, data_type: DataType, nullable: bool) -> Self {
        self.fields.push(Field::new(name.to_string(), data_type, nullable));
        self
    }

    /// Add a boolean field
    pub fn add_boolean(self, name: &str, nullable: bool) -> Self {
        self.add_field(name, DataType::Boolean, nullable)
    }

    /// Add an integer field
    pub fn add_integer(self, name: &str, nullable: bool) -> Self {
        self.add_field(name, DataType::Integer, nullable)
    }

    /// Add a float field
    pub fn add_float(self, name: &str, nullable: bool) -> Self {
        self.add_field(name, DataType::Float, nullable)
    }

    /// Add a string field
    pub fn add_string(self, name: &str, nullable: bool) -> Self {
        self.add_field(name, DataType::String, nullable)
    }

    /// Build the schema
    pub fn build(self) -> Schema {
        Schema::new(self.fields)
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

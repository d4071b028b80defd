// Data module for tabular datasets and ingestion
// Author: Gabriel Demetrios Lafis

mod csv;
mod schema;

pub use self::csv::*;
pub use self::schema::*;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Represents a generic data source
pub trait DataSource {
    /// Read data from the source
    fn read(&self) -> Result<DataSet, DataError>;

    /// Get the source name
    fn name(&self) -> &str;
}

/// Represents a dataset with schema and data
#[derive(Debug, Clone)]
pub struct DataSet {
    pub schema: Schema,
    pub data: Vec<Row>,
    pub metadata: Metadata,
}

impl DataSet {
    /// Create a new empty dataset
    pub fn new(schema: Schema) -> Self {
        DataSet {
            schema,
            data: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// Add a row to the dataset
    pub fn add_row(&mut self, row: Row) -> Result<(), DataError> {
        if row.values.len() != self.schema.fields.len() {
            return Err(DataError::SchemaMismatch {
                expected: self.schema.fields.len(),
                actual: row.values.len(),
            });
        }

        self.data.push(row);
        Ok(())
    }

    /// Get the number of rows in the dataset
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the number of columns in the dataset
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Get a reference to a row by index
    pub fn get_row(&self, index: usize) -> Option<&Row> {
        self.data.get(index)
    }

    /// Column names in schema order
    pub fn column_names(&self) -> Vec<String> {
        self.schema.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.schema.fields.iter().position(|f| f.name == name)
    }

    /// Iterate over the values of one column
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.data.iter().filter_map(move |row| row.get(index))
    }

    /// Non-null values of a column as floats, in row order
    pub fn numeric_values(&self, index: usize) -> Vec<f64> {
        self.column(index).filter_map(Value::as_f64).collect()
    }

    /// Number of null cells in a column
    pub fn null_count(&self, index: usize) -> usize {
        self.column(index).filter(|v| v.is_null()).count()
    }

    /// Indices of numeric columns in schema order
    pub fn numeric_columns(&self) -> Vec<usize> {
        self.columns_of_kind(ColumnKind::Numeric)
    }

    /// Indices of categorical columns in schema order
    pub fn categorical_columns(&self) -> Vec<usize> {
        self.columns_of_kind(ColumnKind::Categorical)
    }

    fn columns_of_kind(&self, kind: ColumnKind) -> Vec<usize> {
        self.schema
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.data_type.kind() == kind)
            .map(|(i, _)| i)
            .collect()
    }

    /// Rough in-memory footprint of the dataset in bytes
    pub fn estimated_memory_bytes(&self) -> usize {
        let names: usize = self.schema.fields.iter().map(|f| f.name.len()).sum();
        let cells: usize = self
            .data
            .iter()
            .flat_map(|row| row.values.iter())
            .map(Value::heap_size)
            .sum();

        names + cells + self.data.len() * std::mem::size_of::<Row>()
    }
}

/// Represents a row in a dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    /// Create a new row with the given values
    pub fn new(values: Vec<Value>) -> Self {
        Row { values }
    }

    /// Get a reference to a value by index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

/// Represents a value in a row
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Check whether the cell is absent
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Total order used for sorting group keys: nulls, booleans, numbers, strings
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        fn rank(value: &Value) -> u8 {
            match value {
                Value::Null => 0,
                Value::Boolean(_) => 1,
                Value::Integer(_) | Value::Float(_) => 2,
                Value::String(_) => 3,
            }
        }

        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => rank(a).cmp(&rank(b)),
            },
        }
    }

    fn heap_size(&self) -> usize {
        let inline = std::mem::size_of::<Value>();
        match self {
            Value::String(s) => inline + s.capacity(),
            _ => inline,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

// Floats compare by bit pattern, so equality is reflexive for NaN as well.
impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::String(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "nan"),
            Value::Boolean(true) => write!(f, "True"),
            Value::Boolean(false) => write!(f, "False"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
                write!(f, "{:.1}", x)
            }
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Value::Float(_) => serializer.serialize_none(),
            Value::String(s) => serializer.serialize_str(s),
        }
    }
}

/// Represents a schema for a dataset
#[derive(Debug, Clone)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema with the given fields
    pub fn new(fields: Vec<Field>) -> Self {
        Schema { fields }
    }

    /// Get a reference to a field by name
    pub fn get_field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get a reference to a field by index
    pub fn get_field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }
}

/// Represents a field in a schema
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    /// Create a new field
    pub fn new(name: String, data_type: DataType, nullable: bool) -> Self {
        Field {
            name,
            data_type,
            nullable,
        }
    }
}

/// Storage type inferred for a column at ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Boolean,
    Integer,
    Float,
    String,
}

impl DataType {
    /// Analysis family of the column
    pub fn kind(self) -> ColumnKind {
        match self {
            DataType::Integer | DataType::Float => ColumnKind::Numeric,
            DataType::Boolean | DataType::String => ColumnKind::Categorical,
        }
    }

    /// Check whether the column holds numbers
    pub fn is_numeric(self) -> bool {
        self.kind() == ColumnKind::Numeric
    }

    /// Type name reported to clients
    pub fn dtype_name(self) -> &'static str {
        match self {
            DataType::Boolean => "bool",
            DataType::Integer => "int64",
            DataType::Float => "float64",
            DataType::String => "object",
        }
    }
}

/// Numeric or categorical column family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Represents metadata for a dataset
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub properties: HashMap<String, String>,
}

impl Metadata {
    /// Create new empty metadata
    pub fn new() -> Self {
        Metadata {
            properties: HashMap::new(),
        }
    }

    /// Add a property to the metadata
    pub fn add(&mut self, key: String, value: String) {
        self.properties.insert(key, value);
    }

    /// Get a property from the metadata
    pub fn get(&self, key: &str) -> Option<&String> {
        self.properties.get(key)
    }
}

/// Represents an error in the data module
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("File type not allowed: '{0}'. Use CSV or TXT files.")]
    UnsupportedFile(String),
    #[error("Schema mismatch: expected {expected} values, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },
}

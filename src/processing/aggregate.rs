// Grouped aggregation
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::chart::{BarChart, Chart, Orientation};
use crate::data::{DataSet, Value};
use super::{mean, median, require_column, round_to, ColumnMap, ProcessingError};

const MAX_GROUPS: usize = 20;
const MAX_LABEL_CHARS: usize = 20;

/// Represents an aggregation function over the non-null values of one group
pub trait AggregateFunction: Send + Sync {
    /// Get the name of the aggregation function
    fn name(&self) -> &str;

    /// Whether the function needs a numeric value column
    fn requires_numeric(&self) -> bool {
        true
    }

    /// Reduce a group to a single value
    fn reduce(&self, values: &[&Value]) -> AggregateValue;
}

/// Count aggregation function
pub struct CountFunction;

impl AggregateFunction for CountFunction {
    fn name(&self) -> &str {
        "count"
    }

    fn requires_numeric(&self) -> bool {
        false
    }

    fn reduce(&self, values: &[&Value]) -> AggregateValue {
        AggregateValue::Count(values.len())
    }
}

/// Sum aggregation function
pub struct SumFunction;

impl AggregateFunction for SumFunction {
    fn name(&self) -> &str {
        "sum"
    }

    fn reduce(&self, values: &[&Value]) -> AggregateValue {
        // Integer columns keep integer sums
        if values.iter().all(|v| matches!(v, Value::Integer(_))) {
            let total = values.iter().fold(0i64, |acc, v| match v {
                Value::Integer(i) => acc.saturating_add(*i),
                _ => acc,
            });
            return AggregateValue::Integer(total);
        }

        AggregateValue::Float(Some(numbers(values).iter().sum()))
    }
}

/// Average aggregation function
pub struct MeanFunction;

impl AggregateFunction for MeanFunction {
    fn name(&self) -> &str {
        "mean"
    }

    fn reduce(&self, values: &[&Value]) -> AggregateValue {
        AggregateValue::Float(mean(&numbers(values)))
    }
}

/// Median aggregation function
pub struct MedianFunction;

impl AggregateFunction for MedianFunction {
    fn name(&self) -> &str {
        "median"
    }

    fn reduce(&self, values: &[&Value]) -> AggregateValue {
        AggregateValue::Float(median(&numbers(values)))
    }
}

fn numbers(values: &[&Value]) -> Vec<f64> {
    values.iter().filter_map(|v| v.as_f64()).collect()
}

/// Reduced value of a group
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AggregateValue {
    Count(usize),
    Integer(i64),
    Float(Option<f64>),
}

impl AggregateValue {
    /// Numeric view used for ordering and charting
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AggregateValue::Count(c) => Some(*c as f64),
            AggregateValue::Integer(i) => Some(*i as f64),
            AggregateValue::Float(f) => f.filter(|v| v.is_finite()),
        }
    }

    fn rounded(self) -> Self {
        match self {
            AggregateValue::Float(f) => AggregateValue::Float(f.filter(|v| v.is_finite()).map(|v| round_to(v, 3))),
            other => other,
        }
    }
}

/// Supported reducers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Mean,
    Sum,
    Count,
    Median,
}

impl Aggregation {
    /// Parse a reducer name; unknown names fall back to mean
    pub fn from_name(name: &str) -> Self {
        match name {
            "sum" => Aggregation::Sum,
            "count" => Aggregation::Count,
            "median" => Aggregation::Median,
            _ => Aggregation::Mean,
        }
    }

    /// Function implementing this reducer
    pub fn function(self) -> Box<dyn AggregateFunction> {
        match self {
            Aggregation::Mean => Box::new(MeanFunction),
            Aggregation::Sum => Box::new(SumFunction),
            Aggregation::Count => Box::new(CountFunction),
            Aggregation::Median => Box::new(MedianFunction),
        }
    }
}

/// Group-by request as sent by clients
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupByRequest {
    pub group_column: Option<String>,
    pub value_column: Option<String>,
    pub aggregation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupByReport {
    pub data: ColumnMap<AggregateValue>,
    #[serde(skip)]
    pub chart: Option<Chart>,
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Group rows by one column and reduce another per group
pub fn group_by(dataset: &DataSet, request: &GroupByRequest) -> Result<GroupByReport, ProcessingError> {
    let (group_column, value_column) = match (non_empty(&request.group_column), non_empty(&request.value_column)) {
        (Some(g), Some(v)) => (g, v),
        _ => {
            return Err(ProcessingError::MissingParameters(
                "group_column and value_column".to_string(),
            ))
        }
    };

    let group_index = require_column(dataset, group_column)?;
    let value_index = require_column(dataset, value_column)?;

    let requested = request.aggregation.as_deref().unwrap_or("mean");
    let aggregation = Aggregation::from_name(requested);
    let function = aggregation.function();
    if function.requires_numeric() && !dataset.schema.fields[value_index].data_type.is_numeric() {
        return Err(ProcessingError::NotNumeric(value_column.to_string()));
    }

    let mut groups: HashMap<&Value, Vec<&Value>> = HashMap::new();
    for row in &dataset.data {
        let (key, value) = match (row.get(group_index), row.get(value_index)) {
            (Some(key), Some(value)) => (key, value),
            _ => continue,
        };
        if key.is_null() {
            continue;
        }

        let group = groups.entry(key).or_default();
        if !value.is_null() {
            group.push(value);
        }
    }

    let mut reduced: Vec<(&Value, AggregateValue)> = groups
        .into_iter()
        .map(|(key, values)| (key, function.reduce(&values).rounded()))
        .collect();

    reduced.sort_by(|a, b| a.0.total_cmp(b.0));
    reduced.sort_by(|a, b| match (a.1.as_f64(), b.1.as_f64()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    reduced.truncate(MAX_GROUPS);

    // Unknown names reduce with mean but keep the requested label
    let title = format!("{} of {}", capitalize(requested), value_column);
    let chart = Chart::Bar(BarChart {
        title: format!("{} by {}", title, group_column),
        x_label: group_column.to_string(),
        y_label: title,
        labels: reduced
            .iter()
            .map(|(key, _)| key.to_string().chars().take(MAX_LABEL_CHARS).collect())
            .collect(),
        values: reduced.iter().map(|(_, v)| v.as_f64().unwrap_or(0.0)).collect(),
        orientation: Orientation::Vertical,
        rotate_labels: true,
        annotate: false,
    });

    Ok(GroupByReport {
        data: reduced.into_iter().map(|(key, value)| (key.to_string(), value)).collect(),
        chart: Some(chart),
    })
}

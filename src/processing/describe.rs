// Descriptive statistics over a whole dataset
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;

use serde::Serialize;

use crate::data::{DataSet, Row};
use super::{percentage, round_opt, value_counts, ColumnMap, NumericSummary};

const MAX_CATEGORICAL_COLUMNS: usize = 10;
const MAX_TOP_VALUES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

/// Count, moments and quartiles of one numeric column, 3 decimals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescription {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub q1: Option<f64>,
    #[serde(rename = "50%")]
    pub median: Option<f64>,
    #[serde(rename = "75%")]
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl From<NumericSummary> for ColumnDescription {
    fn from(summary: NumericSummary) -> Self {
        ColumnDescription {
            count: summary.count,
            mean: round_opt(summary.mean, 3),
            std: round_opt(summary.std, 3),
            min: round_opt(summary.min, 3),
            q1: round_opt(summary.q1, 3),
            median: round_opt(summary.median, 3),
            q3: round_opt(summary.q3, 3),
            max: round_opt(summary.max, 3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub unique_count: usize,
    pub top_values: ColumnMap<usize>,
}

/// Overview of a dataset's shape, completeness and column summaries
#[derive(Debug, Clone, Serialize)]
pub struct DescribeReport {
    pub shape: Shape,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub missing_values: ColumnMap<usize>,
    pub missing_percentage: ColumnMap<f64>,
    pub duplicates: usize,
    pub duplicate_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_stats: Option<ColumnMap<ColumnDescription>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorical_stats: Option<ColumnMap<CategoricalSummary>>,
}

/// Count rows identical to an earlier row
pub fn count_duplicates(dataset: &DataSet) -> usize {
    let mut seen: HashSet<&Row> = HashSet::with_capacity(dataset.len());
    dataset.data.iter().filter(|row| !seen.insert(row)).count()
}

/// Describe a dataset
pub fn describe(dataset: &DataSet) -> DescribeReport {
    let rows = dataset.len();
    let names = dataset.column_names();
    let numeric = dataset.numeric_columns();
    let categorical = dataset.categorical_columns();

    let missing_values: ColumnMap<usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), dataset.null_count(i)))
        .collect();
    let missing_percentage = missing_values
        .iter()
        .map(|(name, &count)| (name, percentage(count, rows)))
        .collect();

    let duplicates = count_duplicates(dataset);

    let numeric_stats = (!numeric.is_empty()).then(|| {
        numeric
            .iter()
            .map(|&i| {
                let summary = NumericSummary::from_values(&dataset.numeric_values(i));
                (names[i].clone(), ColumnDescription::from(summary))
            })
            .collect()
    });

    let categorical_stats = (!categorical.is_empty()).then(|| {
        categorical
            .iter()
            .take(MAX_CATEGORICAL_COLUMNS)
            .map(|&i| {
                let counts = value_counts(dataset.column(i));
                let summary = CategoricalSummary {
                    unique_count: counts.len(),
                    top_values: counts
                        .iter()
                        .take(MAX_TOP_VALUES)
                        .map(|(value, count)| (value.to_string(), *count))
                        .collect(),
                };
                (names[i].clone(), summary)
            })
            .collect()
    });

    DescribeReport {
        shape: Shape {
            rows,
            columns: dataset.column_count(),
        },
        numeric_columns: numeric.iter().map(|&i| names[i].clone()).collect(),
        categorical_columns: categorical.iter().map(|&i| names[i].clone()).collect(),
        missing_values,
        missing_percentage,
        duplicates,
        duplicate_percentage: percentage(duplicates, rows),
        numeric_stats,
        categorical_stats,
    }
}

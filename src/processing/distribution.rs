// Single-column distribution analysis
// Author: Gabriel Demetrios Lafis

use serde::Serialize;

use crate::chart::{BarChart, Chart, ChartGrid, Histogram, Marker, Orientation};
use crate::data::{ColumnKind, DataSet};
use super::{
    box_plot, histogram, iqr_bounds, kurtosis, percentage, require_column, round_opt, skewness,
    value_counts, ColumnMap, NumericSummary, ProcessingError,
};

/// Bins used for distribution histograms
pub const HISTOGRAM_BINS: usize = 30;

const MAX_VALUE_COUNTS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericDistribution {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    pub outliers_count: usize,
    pub outliers_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalDistribution {
    pub count: usize,
    pub unique: usize,
    pub top_value: Option<String>,
    pub top_frequency: usize,
    pub value_counts: ColumnMap<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DistributionStats {
    Numeric(NumericDistribution),
    Categorical(CategoricalDistribution),
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionReport {
    pub column: String,
    pub stats: DistributionStats,
    #[serde(skip)]
    pub chart: Option<Chart>,
}

/// Analyze the distribution of one column
pub fn analyze_column(dataset: &DataSet, column: &str) -> Result<DistributionReport, ProcessingError> {
    let index = require_column(dataset, column)?;

    let (stats, chart) = match dataset.schema.fields[index].data_type.kind() {
        ColumnKind::Numeric => numeric_distribution(column, &dataset.numeric_values(index)),
        ColumnKind::Categorical => categorical_distribution(dataset, index, column),
    };

    Ok(DistributionReport {
        column: column.to_string(),
        stats,
        chart: Some(chart),
    })
}

fn numeric_distribution(column: &str, values: &[f64]) -> (DistributionStats, Chart) {
    let summary = NumericSummary::from_values(values);
    let outliers_count = iqr_bounds(values)
        .map_or(0, |b| values.iter().filter(|&&v| b.is_outlier(v)).count());

    let mut markers = Vec::new();
    if let Some(mean) = summary.mean {
        markers.push(Marker { label: format!("Mean: {:.2}", mean), value: mean });
    }
    if let Some(median) = summary.median {
        markers.push(Marker { label: format!("Median: {:.2}", median), value: median });
    }

    let mut panels = vec![Chart::Histogram(Histogram {
        title: format!("Distribution of {}", column),
        x_label: column.to_string(),
        bins: histogram(values, HISTOGRAM_BINS),
        markers,
    })];
    if let Some(plot) = box_plot(&format!("Box Plot of {}", column), column, values) {
        panels.push(Chart::BoxPlot(plot));
    }

    let stats = NumericDistribution {
        count: summary.count,
        mean: round_opt(summary.mean, 3),
        median: round_opt(summary.median, 3),
        std: round_opt(summary.std, 3),
        min: round_opt(summary.min, 3),
        max: round_opt(summary.max, 3),
        q1: round_opt(summary.q1, 3),
        q3: round_opt(summary.q3, 3),
        skewness: round_opt(skewness(values), 3),
        kurtosis: round_opt(kurtosis(values), 3),
        outliers_count,
        outliers_percentage: percentage(outliers_count, values.len()),
    };

    let chart = Chart::Grid(ChartGrid { title: None, columns: 2, panels });
    (DistributionStats::Numeric(stats), chart)
}

fn categorical_distribution(dataset: &DataSet, index: usize, column: &str) -> (DistributionStats, Chart) {
    let counts = value_counts(dataset.column(index));
    let top: Vec<(String, usize)> = counts
        .iter()
        .take(MAX_VALUE_COUNTS)
        .map(|(value, count)| (value.to_string(), *count))
        .collect();

    // Ties for the mode resolve to the smallest value
    let top_frequency = counts.first().map_or(0, |(_, count)| *count);
    let mode = counts
        .iter()
        .take_while(|(_, count)| *count == top_frequency)
        .map(|(value, _)| *value)
        .min_by(|a, b| a.total_cmp(b));

    let chart = Chart::Bar(BarChart {
        title: format!("Value Counts of {}", column),
        x_label: column.to_string(),
        y_label: "Count".to_string(),
        labels: top.iter().map(|(label, _)| label.clone()).collect(),
        values: top.iter().map(|(_, count)| *count as f64).collect(),
        orientation: Orientation::Vertical,
        rotate_labels: true,
        annotate: true,
    });

    let stats = CategoricalDistribution {
        count: counts.iter().map(|(_, c)| c).sum(),
        unique: counts.len(),
        top_value: mode.map(|value| value.to_string()),
        top_frequency,
        value_counts: top.into_iter().collect(),
    };

    (DistributionStats::Categorical(stats), chart)
}

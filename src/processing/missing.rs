// Missing-value analysis
// Author: Gabriel Demetrios Lafis

use serde::Serialize;

use crate::chart::{BarChart, Chart, ChartGrid, Heatmap, Orientation, Palette};
use crate::data::DataSet;
use super::{percentage, ColumnMap};

/// Rows shown in the missingness pattern heatmap
pub const PATTERN_ROWS: usize = 50;

pub const NO_MISSING_MESSAGE: &str = "No missing values found in the dataset!";

#[derive(Debug, Clone, Serialize)]
pub struct MissingSummary {
    pub missing_counts: ColumnMap<usize>,
    pub missing_percentages: ColumnMap<f64>,
    pub total_missing: usize,
    pub total_missing_percentage: f64,
    pub columns_with_missing: ColumnMap<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MissingReport {
    Complete { message: String, total_missing: usize },
    Missing(MissingSummary),
}

impl MissingReport {
    /// Chart for reports with missing values
    pub fn chart(&self, dataset: &DataSet) -> Option<Chart> {
        match self {
            MissingReport::Complete { .. } => None,
            MissingReport::Missing(summary) => Some(missing_chart(dataset, summary)),
        }
    }
}

/// Summarize missing cells per column and overall
pub fn missing_analysis(dataset: &DataSet) -> MissingReport {
    let rows = dataset.len();
    let missing_counts: ColumnMap<usize> = dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| (field.name.clone(), dataset.null_count(i)))
        .collect();

    let total_missing: usize = missing_counts.iter().map(|(_, &c)| c).sum();
    if total_missing == 0 {
        return MissingReport::Complete {
            message: NO_MISSING_MESSAGE.to_string(),
            total_missing: 0,
        };
    }

    let mut with_missing: Vec<(&str, usize)> = missing_counts
        .iter()
        .filter(|(_, &c)| c > 0)
        .map(|(name, &c)| (name, c))
        .collect();
    with_missing.sort_by(|a, b| b.1.cmp(&a.1));

    MissingReport::Missing(MissingSummary {
        missing_percentages: missing_counts
            .iter()
            .map(|(name, &c)| (name, percentage(c, rows)))
            .collect(),
        total_missing,
        total_missing_percentage: percentage(total_missing, rows * dataset.column_count()),
        columns_with_missing: with_missing.into_iter().collect(),
        missing_counts,
    })
}

fn missing_chart(dataset: &DataSet, summary: &MissingSummary) -> Chart {
    let bars = Chart::Bar(BarChart {
        title: "Missing Values by Column".to_string(),
        x_label: "Number of Missing Values".to_string(),
        y_label: String::new(),
        labels: summary.columns_with_missing.keys().map(str::to_string).collect(),
        values: summary.columns_with_missing.iter().map(|(_, &c)| c as f64).collect(),
        orientation: Orientation::Horizontal,
        rotate_labels: false,
        annotate: false,
    });

    let cells = dataset
        .data
        .iter()
        .take(PATTERN_ROWS)
        .map(|row| {
            row.values
                .iter()
                .map(|v| Some(if v.is_null() { 1.0 } else { 0.0 }))
                .collect()
        })
        .collect();

    let pattern = Chart::Heatmap(Heatmap {
        title: format!("Missing Values Pattern (First {} Rows)", PATTERN_ROWS),
        x_labels: dataset.column_names(),
        y_labels: Vec::new(),
        cells,
        range: (0.0, 1.0),
        palette: Palette::Sequential,
        annotate: false,
    });

    Chart::Grid(ChartGrid {
        title: None,
        columns: 2,
        panels: vec![bars, pattern],
    })
}

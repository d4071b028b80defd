// Pairwise correlation analysis
// Author: Gabriel Demetrios Lafis

use serde::Serialize;

use crate::chart::{Chart, Heatmap, Palette};
use crate::data::DataSet;
use super::{correlation, round_opt, round_to, ColumnMap, ProcessingError};

/// Absolute coefficient above which a pair is reported as strong
pub const STRONG_CORRELATION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrongCorrelation {
    pub col1: String,
    pub col2: String,
    pub correlation: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationReport {
    pub correlation_matrix: ColumnMap<ColumnMap<Option<f64>>>,
    pub strong_correlations: Vec<StrongCorrelation>,
    #[serde(skip)]
    pub chart: Option<Chart>,
}

/// Pearson coefficients between the given columns, 3 decimals
///
/// Each pair uses only rows where both values are present. The diagonal is 1.0.
pub fn correlation_matrix(dataset: &DataSet, columns: &[usize]) -> Vec<Vec<Option<f64>>> {
    let n = columns.len();
    let mut matrix = vec![vec![None; n]; n];

    for i in 0..n {
        matrix[i][i] = Some(1.0);
        for j in (i + 1)..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = dataset
                .data
                .iter()
                .filter_map(|row| {
                    let x = row.get(columns[i])?.as_f64()?;
                    let y = row.get(columns[j])?.as_f64()?;
                    Some((x, y))
                })
                .unzip();

            let r = round_opt(correlation(&xs, &ys), 3);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    matrix
}

/// Correlate every numeric column with every other
pub fn correlate(dataset: &DataSet) -> Result<CorrelationReport, ProcessingError> {
    let columns = dataset.numeric_columns();
    if columns.len() < 2 {
        return Err(ProcessingError::InsufficientColumns {
            required: 2,
            purpose: " for correlation analysis".to_string(),
        });
    }

    let names: Vec<String> = columns
        .iter()
        .map(|&i| dataset.schema.fields[i].name.clone())
        .collect();
    let matrix = correlation_matrix(dataset, &columns);

    let mut strong = Vec::new();
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            if let Some(r) = matrix[i][j] {
                if r.abs() > STRONG_CORRELATION_THRESHOLD {
                    strong.push(StrongCorrelation {
                        col1: names[i].clone(),
                        col2: names[j].clone(),
                        correlation: round_to(r, 3),
                    });
                }
            }
        }
    }
    strong.sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));

    let correlation_matrix = names
        .iter()
        .enumerate()
        .map(|(j, col)| {
            let inner: ColumnMap<Option<f64>> = names
                .iter()
                .enumerate()
                .map(|(i, row)| (row.clone(), matrix[i][j]))
                .collect();
            (col.clone(), inner)
        })
        .collect();

    let chart = Chart::Heatmap(Heatmap {
        title: "Correlation Matrix Heatmap".to_string(),
        x_labels: names.clone(),
        y_labels: names,
        cells: matrix,
        range: (-1.0, 1.0),
        palette: Palette::Diverging,
        annotate: true,
    });

    Ok(CorrelationReport {
        correlation_matrix,
        strong_correlations: strong,
        chart: Some(chart),
    })
}

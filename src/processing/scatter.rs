// Relationship plots between columns
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::chart::{Chart, ChartGrid, Histogram, ScatterChart, ScatterSeries};
use crate::data::{ColumnKind, DataSet, Value};
use super::{
    correlation, histogram, linear_fit, max, min, require_column, round_opt, ProcessingError,
};

/// Points sampled along the trend line
pub const TREND_POINTS: usize = 100;
/// Numeric columns included in a pair plot
pub const PAIR_PLOT_COLUMNS: usize = 5;
/// Row count above which pair plots are sampled
pub const PAIR_PLOT_SAMPLE: usize = 1000;
/// Seed for pair plot sampling
pub const SAMPLE_SEED: u64 = 42;

const PAIR_PLOT_BINS: usize = 20;

/// Scatter request as sent by clients
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScatterRequest {
    pub x_column: Option<String>,
    pub y_column: Option<String>,
    pub hue_column: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterReport {
    pub correlation: Option<f64>,
    #[serde(skip)]
    pub chart: Option<Chart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PairPlotReport {
    pub columns_used: Vec<String>,
    #[serde(skip)]
    pub chart: Option<Chart>,
}

/// Maps the values of one column onto plot coordinates
struct Axis {
    index: usize,
    categories: Option<Vec<String>>,
    positions: HashMap<String, usize>,
}

impl Axis {
    fn new(dataset: &DataSet, index: usize) -> Self {
        if dataset.schema.fields[index].data_type.kind() == ColumnKind::Numeric {
            return Axis { index, categories: None, positions: HashMap::new() };
        }

        let mut categories = Vec::new();
        let mut positions = HashMap::new();
        for value in dataset.column(index).filter(|v| !v.is_null()) {
            let label = value.to_string();
            if !positions.contains_key(&label) {
                positions.insert(label.clone(), categories.len());
                categories.push(label);
            }
        }

        Axis { index, categories: Some(categories), positions }
    }

    fn is_numeric(&self) -> bool {
        self.categories.is_none()
    }

    fn coordinate(&self, value: &Value) -> Option<f64> {
        match self.categories {
            None => value.as_f64(),
            Some(_) if value.is_null() => None,
            Some(_) => self.positions.get(&value.to_string()).map(|&p| p as f64),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Scatter one column against another, optionally split by a hue column
pub fn scatter(dataset: &DataSet, request: &ScatterRequest) -> Result<ScatterReport, ProcessingError> {
    let (x_name, y_name) = match (non_empty(&request.x_column), non_empty(&request.y_column)) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(ProcessingError::MissingParameters("x_column and y_column".to_string())),
    };

    let x = Axis::new(dataset, require_column(dataset, x_name)?);
    let y = Axis::new(dataset, require_column(dataset, y_name)?);
    let hue = non_empty(&request.hue_column).and_then(|name| dataset.column_index(name));

    let mut series: Vec<ScatterSeries> = Vec::new();
    let mut series_index: HashMap<String, usize> = HashMap::new();
    let mut pairs = Vec::new();

    for row in &dataset.data {
        let point = match (
            row.get(x.index).and_then(|v| x.coordinate(v)),
            row.get(y.index).and_then(|v| y.coordinate(v)),
        ) {
            (Some(px), Some(py)) => (px, py),
            _ => continue,
        };
        pairs.push(point);

        let name = match hue.and_then(|h| row.get(h)) {
            Some(value) if !value.is_null() => Some(value.to_string()),
            Some(_) => continue,
            None => None,
        };
        let key = name.clone().unwrap_or_default();
        let slot = *series_index.entry(key).or_insert_with(|| {
            series.push(ScatterSeries { name, points: Vec::new() });
            series.len() - 1
        });
        series[slot].points.push(point);
    }

    let (mut trend, mut r) = (None, None);
    if x.is_numeric() && y.is_numeric() {
        let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();
        r = round_opt(correlation(&xs, &ys), 3);

        if let (Some((slope, intercept)), Some(lo), Some(hi)) = (linear_fit(&xs, &ys), min(&xs), max(&xs)) {
            let step = (hi - lo) / (TREND_POINTS - 1) as f64;
            trend = Some(
                (0..TREND_POINTS)
                    .map(|i| {
                        let px = lo + step * i as f64;
                        (px, slope * px + intercept)
                    })
                    .collect(),
            );
        }
    }

    let chart = Chart::Scatter(ScatterChart {
        title: format!("{} vs {}", y_name, x_name),
        x_label: x_name.to_string(),
        y_label: y_name.to_string(),
        series,
        trend,
        x_categories: x.categories,
        y_categories: y.categories,
    });

    Ok(ScatterReport { correlation: r, chart: Some(chart) })
}

/// Row indices used for a pair plot, sampled deterministically when large
pub fn sample_rows(rows: usize, limit: usize) -> Vec<usize> {
    if rows <= limit {
        return (0..rows).collect();
    }

    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    let mut picked = rand::seq::index::sample(&mut rng, rows, limit).into_vec();
    picked.sort_unstable();
    picked
}

/// Grid of pairwise scatter plots with histograms on the diagonal
pub fn pair_plot(dataset: &DataSet) -> Result<PairPlotReport, ProcessingError> {
    let columns: Vec<usize> = dataset.numeric_columns().into_iter().take(PAIR_PLOT_COLUMNS).collect();
    if columns.len() < 2 {
        return Err(ProcessingError::InsufficientColumns {
            required: 2,
            purpose: String::new(),
        });
    }

    let rows: Vec<_> = sample_rows(dataset.len(), PAIR_PLOT_SAMPLE)
        .into_iter()
        .filter_map(|i| dataset.get_row(i))
        .collect();
    let names: Vec<String> = columns
        .iter()
        .map(|&c| dataset.schema.fields[c].name.clone())
        .collect();

    let mut panels = Vec::with_capacity(columns.len() * columns.len());
    for (i, &row_col) in columns.iter().enumerate() {
        for (j, &col_col) in columns.iter().enumerate() {
            if i == j {
                let values: Vec<f64> = rows.iter().filter_map(|r| r.get(row_col)?.as_f64()).collect();
                panels.push(Chart::Histogram(Histogram {
                    title: names[i].clone(),
                    x_label: names[i].clone(),
                    bins: histogram(&values, PAIR_PLOT_BINS),
                    markers: Vec::new(),
                }));
                continue;
            }

            let points = rows
                .iter()
                .filter_map(|r| Some((r.get(col_col)?.as_f64()?, r.get(row_col)?.as_f64()?)))
                .collect();
            panels.push(Chart::Scatter(ScatterChart {
                title: String::new(),
                x_label: names[j].clone(),
                y_label: names[i].clone(),
                series: vec![ScatterSeries { name: None, points }],
                trend: None,
                x_categories: None,
                y_categories: None,
            }));
        }
    }

    let chart = Chart::Grid(ChartGrid {
        title: Some("Pair Plot of Numeric Variables".to_string()),
        columns: columns.len(),
        panels,
    });

    Ok(PairPlotReport { columns_used: names, chart: Some(chart) })
}

// IQR-based outlier detection
// Author: Gabriel Demetrios Lafis

use serde::Serialize;

use crate::chart::{BoxPlot, Chart, ChartGrid};
use crate::data::DataSet;
use super::{percentage, quantile_sorted, round_opt, sorted, ColumnMap, ProcessingError};

/// Multiplier applied to the interquartile range
pub const IQR_MULTIPLIER: f64 = 1.5;

const MAX_CHARTED_COLUMNS: usize = 8;
const CHARTS_PER_ROW: usize = 4;

/// Quartiles and the fences derived from them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl IqrBounds {
    /// Check whether a value lies strictly outside the fences
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower_bound || value > self.upper_bound
    }
}

/// Compute IQR fences; `None` for an empty sample
pub fn iqr_bounds(values: &[f64]) -> Option<IqrBounds> {
    let sorted = sorted(values);
    let q1 = quantile_sorted(&sorted, 0.25)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;

    Some(IqrBounds {
        q1,
        q3,
        iqr,
        lower_bound: q1 - IQR_MULTIPLIER * iqr,
        upper_bound: q3 + IQR_MULTIPLIER * iqr,
    })
}

/// Values strictly outside the IQR fences, in input order
pub fn flag_outliers(values: &[f64]) -> Vec<f64> {
    match iqr_bounds(values) {
        Some(bounds) => values.iter().copied().filter(|&v| bounds.is_outlier(v)).collect(),
        None => Vec::new(),
    }
}

/// Box plot with whiskers at the most extreme values inside the fences
pub fn box_plot(title: &str, y_label: &str, values: &[f64]) -> Option<BoxPlot> {
    let bounds = iqr_bounds(values)?;
    let sorted = sorted(values);
    let median = quantile_sorted(&sorted, 0.5)?;

    let inside = sorted.iter().copied().filter(|&v| !bounds.is_outlier(v));
    let whisker_low = inside.clone().next().unwrap_or(bounds.q1);
    let whisker_high = inside.last().unwrap_or(bounds.q3);

    Some(BoxPlot {
        title: title.to_string(),
        y_label: y_label.to_string(),
        q1: bounds.q1,
        median,
        q3: bounds.q3,
        whisker_low,
        whisker_high,
        fliers: sorted.into_iter().filter(|&v| bounds.is_outlier(v)).collect(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOutliers {
    pub count: usize,
    pub percentage: f64,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    pub iqr: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlierReport {
    pub outlier_info: ColumnMap<ColumnOutliers>,
    pub total_columns_with_outliers: usize,
    #[serde(skip)]
    pub chart: Option<Chart>,
}

/// Scan every numeric column for outliers
pub fn outliers(dataset: &DataSet) -> Result<OutlierReport, ProcessingError> {
    let columns = dataset.numeric_columns();
    if columns.is_empty() {
        return Err(ProcessingError::NoNumericColumns);
    }

    let mut outlier_info = ColumnMap::new();
    let mut panels = Vec::new();

    for &i in &columns {
        let name = &dataset.schema.fields[i].name;
        let values = dataset.numeric_values(i);
        let bounds = iqr_bounds(&values);
        let count = bounds.map_or(0, |b| values.iter().filter(|&&v| b.is_outlier(v)).count());

        if count > 0 && panels.len() < MAX_CHARTED_COLUMNS {
            let title = format!("{}\n({} outliers)", name, count);
            if let Some(plot) = box_plot(&title, name, &values) {
                panels.push(Chart::BoxPlot(plot));
            }
        }

        outlier_info.insert(
            name.clone(),
            ColumnOutliers {
                count,
                percentage: percentage(count, values.len()),
                lower_bound: round_opt(bounds.map(|b| b.lower_bound), 3),
                upper_bound: round_opt(bounds.map(|b| b.upper_bound), 3),
                iqr: round_opt(bounds.map(|b| b.iqr), 3),
            },
        );
    }

    let total_columns_with_outliers = panels.len();
    let chart = (!panels.is_empty()).then(|| {
        Chart::Grid(ChartGrid {
            title: Some("Outlier Detection (IQR Method)".to_string()),
            columns: CHARTS_PER_ROW.min(panels.len()),
            panels,
        })
    });

    Ok(OutlierReport {
        outlier_info,
        total_columns_with_outliers,
        chart,
    })
}

// Chart model and rendering capability
// Author: Gabriel Demetrios Lafis

//! Typed chart descriptions produced by the analysis engines.
//!
//! Engines never draw anything themselves: they return a [`Chart`] value and the HTTP layer
//! hands it to whichever [`ChartRenderer`] the server was built with. The resulting
//! [`ChartImage`] is embedded in responses as a data URI.

mod svg;

pub use svg::*;

use thiserror::Error;

use crate::processing::HistogramBin;

/// A chart ready to be rendered
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Heatmap(Heatmap),
    Histogram(Histogram),
    BoxPlot(BoxPlot),
    Bar(BarChart),
    Scatter(ScatterChart),
    Grid(ChartGrid),
}

impl Chart {
    /// Chart title, if any
    pub fn title(&self) -> Option<&str> {
        match self {
            Chart::Heatmap(c) => Some(&c.title),
            Chart::Histogram(c) => Some(&c.title),
            Chart::BoxPlot(c) => Some(&c.title),
            Chart::Bar(c) => Some(&c.title),
            Chart::Scatter(c) => Some(&c.title),
            Chart::Grid(c) => c.title.as_deref(),
        }
    }
}

/// Color scale for heatmap cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// Blue through grey to red, centered on zero
    Diverging,
    /// Pale yellow to dark red
    Sequential,
}

/// Matrix of colored cells
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub title: String,
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    /// Row-major cell values; `None` cells are left blank
    pub cells: Vec<Vec<Option<f64>>>,
    pub range: (f64, f64),
    pub palette: Palette,
    pub annotate: bool,
}

/// Vertical reference line drawn over a histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub title: String,
    pub x_label: String,
    pub bins: Vec<HistogramBin>,
    pub markers: Vec<Marker>,
}

/// Box-and-whisker summary of one numeric sample
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlot {
    pub title: String,
    pub y_label: String,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub fliers: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub orientation: Orientation,
    pub rotate_labels: bool,
    pub annotate: bool,
}

/// Named group of points in a scatter chart
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub name: Option<String>,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
    /// Polyline drawn dashed over the points
    pub trend: Option<Vec<(f64, f64)>>,
    /// Category names when an axis is categorical; positions are indices into these
    pub x_categories: Option<Vec<String>>,
    pub y_categories: Option<Vec<String>>,
}

/// Several charts laid out row by row
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGrid {
    pub title: Option<String>,
    pub columns: usize,
    pub panels: Vec<Chart>,
}

impl ChartGrid {
    /// Number of rows needed for the panels
    pub fn rows(&self) -> usize {
        let columns = self.columns.max(1);
        (self.panels.len() + columns - 1) / columns
    }
}

/// Encoded chart image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ChartImage {
    /// Create an image from encoded bytes
    pub fn new(mime_type: &str, bytes: Vec<u8>) -> Self {
        ChartImage {
            mime_type: mime_type.to_string(),
            bytes,
        }
    }

    /// Inline `data:` URI for embedding in JSON responses
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, base64::encode(&self.bytes))
    }
}

/// Capability that turns chart descriptions into images
pub trait ChartRenderer {
    /// Render a chart
    fn render(&self, chart: &Chart) -> Result<ChartImage, ChartError>;
}

/// Represents an error while rendering a chart
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Chart has nothing to draw: {0}")]
    EmptyChart(String),
    #[error("Render error: {0}")]
    Render(String),
}

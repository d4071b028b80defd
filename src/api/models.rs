// API request and response models
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};

/// Query string of an upload request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

/// Query string of a data preview request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Analysis result with its rendered chart
#[derive(Debug, Serialize)]
pub struct ChartResponse<T: Serialize> {
    #[serde(flatten)]
    pub report: T,
    pub chart: Option<String>,
}

/// Correlation result; the chart is reported as `heatmap`
#[derive(Debug, Serialize)]
pub struct HeatmapResponse<T: Serialize> {
    #[serde(flatten)]
    pub report: T,
    pub heatmap: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DatasetList {
    pub datasets: Vec<String>,
}

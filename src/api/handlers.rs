// API request handlers
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use log::{debug, info};
use serde_json::json;

use crate::chart::{Chart, ChartRenderer};
use crate::data::{self, is_allowed_file, DataSet};
use crate::processing::{
    analyze_column, columns, correlate, describe, group_by, missing_analysis, outliers, page,
    pair_plot, scatter, upload_summary, GroupByRequest, ScatterRequest, DEFAULT_PER_PAGE,
};
use crate::utils::{sanitize_filename, validate_not_empty};
use super::{models::*, ApiError, SharedRenderer, SharedStorage};

fn load(storage: &SharedStorage, id: &str) -> Result<Arc<DataSet>, ApiError> {
    Ok(storage.load(id)?)
}

/// Render an optional chart into a data URI
pub fn render_chart(renderer: &dyn ChartRenderer, chart: Option<&Chart>) -> Result<Option<String>, ApiError> {
    chart
        .map(|chart| renderer.render(chart).map(|image| image.to_data_uri()))
        .transpose()
        .map_err(ApiError::from)
}

/// Upload a CSV or TXT file sent as the raw request body
pub async fn upload_file(
    storage: web::Data<SharedStorage>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    if body.is_empty() {
        return Err(ApiError::ValidationError("No file provided".to_string()));
    }

    let original = validate_not_empty(query.filename.as_deref(), "No file selected")
        .map_err(ApiError::ValidationError)?;
    if !is_allowed_file(&original) {
        return Err(ApiError::ValidationError(
            "File type not allowed. Use CSV or TXT files.".to_string(),
        ));
    }

    let filename = sanitize_filename(&original);
    let dataset = data::parse(&body, &filename)?;
    let file_id = storage.register(dataset)?;
    let dataset = load(&storage, &file_id)?;

    info!(
        "Registered dataset {} from '{}' ({} rows, {} columns)",
        file_id,
        filename,
        dataset.len(),
        dataset.column_count()
    );

    Ok(HttpResponse::Ok().json(upload_summary(&file_id, &filename, &dataset)))
}

/// List registered datasets
pub async fn list_datasets(storage: web::Data<SharedStorage>) -> Result<HttpResponse, ApiError> {
    let datasets = storage.list()?;

    Ok(HttpResponse::Ok().json(DatasetList { datasets }))
}

/// Unregister a dataset
pub async fn delete_dataset(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    storage.delete(&id)?;
    info!("Deleted dataset {}", id);

    Ok(HttpResponse::Ok().json(json!({ "deleted": id })))
}

/// Descriptive statistics
pub async fn basic_stats(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let dataset = load(&storage, &path)?;
    let report = describe(&dataset);
    debug!("Described dataset {}: {} duplicates", path, report.duplicates);

    Ok(HttpResponse::Ok().json(report))
}

/// Correlation matrix and heatmap
pub async fn correlation_analysis(
    storage: web::Data<SharedStorage>,
    renderer: web::Data<SharedRenderer>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let dataset = load(&storage, &path)?;
    let report = correlate(&dataset)?;
    let heatmap = render_chart(renderer.get_ref().as_ref(), report.chart.as_ref())?;
    debug!(
        "Correlated dataset {}: {} strong pairs",
        path,
        report.strong_correlations.len()
    );

    Ok(HttpResponse::Ok().json(HeatmapResponse { report, heatmap }))
}

/// Distribution of one column
pub async fn distribution_analysis(
    storage: web::Data<SharedStorage>,
    renderer: web::Data<SharedRenderer>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (id, column) = path.into_inner();
    let dataset = load(&storage, &id)?;
    let report = analyze_column(&dataset, &column)?;
    let chart = render_chart(renderer.get_ref().as_ref(), report.chart.as_ref())?;

    Ok(HttpResponse::Ok().json(ChartResponse { report, chart }))
}

/// Scatter plot of two columns
pub async fn scatter_plot(
    storage: web::Data<SharedStorage>,
    renderer: web::Data<SharedRenderer>,
    path: web::Path<String>,
    payload: web::Json<ScatterRequest>,
) -> Result<HttpResponse, ApiError> {
    let dataset = load(&storage, &path)?;
    let report = scatter(&dataset, &payload)?;
    let chart = render_chart(renderer.get_ref().as_ref(), report.chart.as_ref())?;

    Ok(HttpResponse::Ok().json(ChartResponse { report, chart }))
}

/// Pairwise plot grid of the leading numeric columns
pub async fn pairplot(
    storage: web::Data<SharedStorage>,
    renderer: web::Data<SharedRenderer>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let dataset = load(&storage, &path)?;
    let report = pair_plot(&dataset)?;
    let chart = render_chart(renderer.get_ref().as_ref(), report.chart.as_ref())?;

    Ok(HttpResponse::Ok().json(ChartResponse { report, chart }))
}

/// Missing value counts and pattern
pub async fn missing_values(
    storage: web::Data<SharedStorage>,
    renderer: web::Data<SharedRenderer>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let dataset = load(&storage, &path)?;
    let report = missing_analysis(&dataset);
    let chart = render_chart(renderer.get_ref().as_ref(), report.chart(&dataset).as_ref())?;

    Ok(HttpResponse::Ok().json(ChartResponse { report, chart }))
}

/// Outlier scan over all numeric columns
pub async fn outlier_analysis(
    storage: web::Data<SharedStorage>,
    renderer: web::Data<SharedRenderer>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let dataset = load(&storage, &path)?;
    let report = outliers(&dataset)?;
    let chart = render_chart(renderer.get_ref().as_ref(), report.chart.as_ref())?;
    debug!(
        "Scanned dataset {}: {} columns with outliers",
        path, report.total_columns_with_outliers
    );

    Ok(HttpResponse::Ok().json(ChartResponse { report, chart }))
}

/// Grouped aggregation
pub async fn groupby_analysis(
    storage: web::Data<SharedStorage>,
    renderer: web::Data<SharedRenderer>,
    path: web::Path<String>,
    payload: web::Json<GroupByRequest>,
) -> Result<HttpResponse, ApiError> {
    let dataset = load(&storage, &path)?;
    let report = group_by(&dataset, &payload)?;
    let chart = render_chart(renderer.get_ref().as_ref(), report.chart.as_ref())?;

    Ok(HttpResponse::Ok().json(ChartResponse { report, chart }))
}

fn positive(value: Option<i64>, default: usize, name: &str) -> Result<usize, ApiError> {
    match value {
        None => Ok(default),
        Some(v) if v >= 1 => Ok(v as usize),
        Some(_) => Err(ApiError::ValidationError(format!("'{}' must be at least 1", name))),
    }
}

/// One page of rows
pub async fn data_preview(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ApiError> {
    let dataset = load(&storage, &path)?;
    let page_number = positive(query.page, 1, "page")?;
    let per_page = positive(query.per_page, DEFAULT_PER_PAGE, "per_page")?;

    Ok(HttpResponse::Ok().json(page(&dataset, page_number, per_page)?))
}

/// Column types and completeness
pub async fn get_columns(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let dataset = load(&storage, &path)?;

    Ok(HttpResponse::Ok().json(json!({ "columns": columns(&dataset) })))
}

// Pagination and column introspection
// Author: Gabriel Demetrios Lafis

use serde::Serialize;

use crate::data::{DataSet, Row, Value};
use super::{ColumnMap, ProcessingError};

/// Default page size for data previews
pub const DEFAULT_PER_PAGE: usize = 50;
/// Rows included in an upload summary
pub const UPLOAD_PREVIEW_ROWS: usize = 10;

/// One row keyed by column name
pub type Record = ColumnMap<Value>;

#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub data: Vec<Record>,
    pub total_rows: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub is_numeric: bool,
    pub non_null_count: usize,
    pub null_count: usize,
}

/// Summary returned after a dataset has been registered
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub file_id: String,
    pub filename: String,
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub column_types: ColumnMap<String>,
    pub preview: Vec<Record>,
    pub memory_usage: String,
}

/// Convert rows into records keyed by column name
pub fn records<'a>(dataset: &DataSet, rows: impl Iterator<Item = &'a Row>) -> Vec<Record> {
    rows.map(|row| {
        dataset
            .schema
            .fields
            .iter()
            .zip(&row.values)
            .map(|(field, value)| (field.name.clone(), value.clone()))
            .collect()
    })
    .collect()
}

/// One page of rows; pages past the end are empty
pub fn page(dataset: &DataSet, page: usize, per_page: usize) -> Result<PageReport, ProcessingError> {
    if page < 1 || per_page < 1 {
        return Err(ProcessingError::InvalidArgument(
            "page and per_page must be at least 1".to_string(),
        ));
    }

    let total_rows = dataset.len();
    let start = (page - 1).saturating_mul(per_page);

    Ok(PageReport {
        data: records(dataset, dataset.data.iter().skip(start).take(per_page)),
        total_rows,
        page,
        per_page,
        total_pages: (total_rows + per_page - 1) / per_page,
    })
}

/// Per-column type and completeness
pub fn columns(dataset: &DataSet) -> Vec<ColumnInfo> {
    dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let null_count = dataset.null_count(i);
            ColumnInfo {
                name: field.name.clone(),
                dtype: field.data_type.dtype_name().to_string(),
                is_numeric: field.data_type.is_numeric(),
                non_null_count: dataset.len() - null_count,
                null_count,
            }
        })
        .collect()
}

/// Summarize a freshly registered dataset
pub fn upload_summary(file_id: &str, filename: &str, dataset: &DataSet) -> UploadReport {
    UploadReport {
        file_id: file_id.to_string(),
        filename: filename.to_string(),
        rows: dataset.len(),
        columns: dataset.column_count(),
        column_names: dataset.column_names(),
        column_types: dataset
            .schema
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.data_type.dtype_name().to_string()))
            .collect(),
        preview: records(dataset, dataset.data.iter().take(UPLOAD_PREVIEW_ROWS)),
        memory_usage: format!("{:.2} KB", dataset.estimated_memory_bytes() as f64 / 1024.0),
    }
}

// Simple analysis example
// Author: Gabriel Demetrios Lafis

use rust_eda_service::{
    chart::{ChartRenderer, SvgRenderer},
    data,
    processing::{correlate, describe, group_by, missing_analysis, outliers, GroupByRequest},
};

const SALES: &str = "region,units,price,discount\n\
north,12,19.99,0.1\n\
south,7,24.50,\n\
north,30,9.75,0.2\n\
east,3,120.00,0.0\n\
west,18,15.25,0.15\n\
south,22,11.00,NA\n\
east,5,99.90,0.05\n";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = data::parse(SALES.as_bytes(), "sales.csv")?;
    println!("Loaded {} rows x {} columns", dataset.len(), dataset.schema.fields.len());

    // Descriptive statistics
    let summary = describe(&dataset);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    // Correlation with the rendered heatmap
    let correlation = correlate(&dataset)?;
    for pair in &correlation.strong_correlations {
        println!("{} ~ {}: {:.3}", pair.col1, pair.col2, pair.correlation);
    }

    let renderer = SvgRenderer::default();
    if let Some(chart) = &correlation.chart {
        let image = renderer.render(chart)?;
        std::fs::write("correlation.svg", &image.bytes)?;
        println!("Wrote correlation.svg ({} bytes)", image.bytes.len());
    }

    let report = outliers(&dataset)?;
    println!("Columns with outliers: {}", report.total_columns_with_outliers);

    let missing = missing_analysis(&dataset);
    println!("{}", serde_json::to_string_pretty(&missing)?);

    let grouped = group_by(
        &dataset,
        &GroupByRequest {
            group_column: Some("region".to_string()),
            value_column: Some("units".to_string()),
            aggregation: Some("sum".to_string()),
        },
    )?;
    println!("{}", serde_json::to_string_pretty(&grouped.data)?);

    Ok(())
}

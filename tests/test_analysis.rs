// Analysis engine tests
// Author: Gabriel Demetrios Lafis

use serde_json::json;

use rust_eda_service::chart::Chart;
use rust_eda_service::data::{self, DataSet};
use rust_eda_service::processing::{
    analyze_column, columns, correlate, describe, group_by, missing_analysis, outliers, page,
    pair_plot, scatter, AggregateValue, DistributionStats, GroupByRequest, MissingReport,
    ProcessingError, ScatterRequest,
};

fn load(csv: &str) -> DataSet {
    data::parse(csv.as_bytes(), "test.csv").unwrap()
}

fn sales() -> DataSet {
    load(
        "region,product,units,price,note\n\
         north,apple,10,1.5,\n\
         south,pear,20,2.5,promo\n\
         north,apple,30,3.5,\n\
         east,plum,40,4.5,\n\
         ,pear,50,5.5,\n\
         south,plum,,6.5,promo\n",
    )
}

fn group_request(group: &str, value: &str, aggregation: Option<&str>) -> GroupByRequest {
    GroupByRequest {
        group_column: Some(group.to_string()),
        value_column: Some(value.to_string()),
        aggregation: aggregation.map(str::to_string),
    }
}

#[test]
fn test_describe_duplicates_and_top_values() {
    let dataset = load("age,city\n25,NYC\n30,LA\n25,NYC\n");
    let report = describe(&dataset);

    assert_eq!(report.shape.rows, 3);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.duplicate_percentage, 33.33);
    assert_eq!(report.numeric_columns, vec!["age"]);
    assert_eq!(report.categorical_columns, vec!["city"]);

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["categorical_stats"]["city"]["unique_count"], 2);
    assert_eq!(value["categorical_stats"]["city"]["top_values"], json!({"NYC": 2, "LA": 1}));
    assert_eq!(value["numeric_stats"]["age"]["50%"], 25.0);
    assert_eq!(value["numeric_stats"]["age"]["std"], 2.887);
}

#[test]
fn test_describe_empty_dataset_guards_percentages() {
    let report = describe(&load("a,b\n"));
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(report.shape.rows, 0);
    assert_eq!(report.duplicate_percentage, 0.0);
    assert_eq!(value["missing_percentage"], json!({"a": 0.0, "b": 0.0}));
    assert!(value.get("categorical_stats").is_none());
}

#[test]
fn test_correlation_matrix_is_symmetric() {
    let dataset = load("x,y,z\n1,2,9\n2,4,7\n3,6,8\n4,8,1\n");
    let report = correlate(&dataset).unwrap();
    let value = serde_json::to_value(&report).unwrap();
    let matrix = &value["correlation_matrix"];

    for a in ["x", "y", "z"] {
        assert_eq!(matrix[a][a], 1.0);
        for b in ["x", "y", "z"] {
            assert_eq!(matrix[a][b], matrix[b][a]);
        }
    }
    assert_eq!(matrix["x"]["y"], 1.0);

    let strong: Vec<(&str, &str)> = report
        .strong_correlations
        .iter()
        .map(|s| (s.col1.as_str(), s.col2.as_str()))
        .collect();
    assert_eq!(strong[0], ("x", "y"));
    assert!(report
        .strong_correlations
        .windows(2)
        .all(|w| w[0].correlation.abs() >= w[1].correlation.abs()));
    assert!(matches!(report.chart, Some(Chart::Heatmap(_))));
}

#[test]
fn test_correlation_needs_two_numeric_columns() {
    let err = correlate(&load("x,name\n1,a\n2,b\n")).unwrap_err();

    assert!(matches!(err, ProcessingError::InsufficientColumns { required: 2, .. }));
    assert_eq!(err.to_string(), "Need at least 2 numeric columns for correlation analysis");
}

#[test]
fn test_numeric_distribution() {
    let dataset = load("v\n1\n2\n3\n4\n5\n100\n");
    let report = analyze_column(&dataset, "v").unwrap();

    match &report.stats {
        DistributionStats::Numeric(stats) => {
            assert_eq!(stats.count, 6);
            assert_eq!(stats.q1, Some(2.25));
            assert_eq!(stats.q3, Some(4.75));
            assert_eq!(stats.median, Some(3.5));
            assert_eq!(stats.outliers_count, 1);
            assert_eq!(stats.outliers_percentage, 16.67);
        }
        other => panic!("unexpected stats: {:?}", other),
    }

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["stats"]["type"], "numeric");
    assert_eq!(value["column"], "v");
}

#[test]
fn test_all_null_column_distribution() {
    let dataset = load("v,w\n,1\n,2\n");
    let report = analyze_column(&dataset, "v").unwrap();

    match &report.stats {
        DistributionStats::Numeric(stats) => {
            assert_eq!(stats.count, 0);
            assert_eq!(stats.mean, None);
            assert_eq!(stats.skewness, None);
            assert_eq!(stats.outliers_count, 0);
            assert_eq!(stats.outliers_percentage, 0.0);
        }
        other => panic!("unexpected stats: {:?}", other),
    }
}

#[test]
fn test_categorical_distribution() {
    let report = analyze_column(&sales(), "product").unwrap();

    match &report.stats {
        DistributionStats::Categorical(stats) => {
            assert_eq!(stats.count, 6);
            assert_eq!(stats.unique, 3);
            // Every product appears twice; the smallest wins
            assert_eq!(stats.top_value.as_deref(), Some("apple"));
            assert_eq!(stats.top_frequency, 2);
        }
        other => panic!("unexpected stats: {:?}", other),
    }

    assert!(matches!(
        analyze_column(&sales(), "missing"),
        Err(ProcessingError::ColumnNotFound(_))
    ));
}

#[test]
fn test_categorical_mode_ties_pick_smallest_value() {
    let dataset = load("city\nNYC\nLA\nNYC\nLA\n");
    let report = analyze_column(&dataset, "city").unwrap();

    match &report.stats {
        DistributionStats::Categorical(stats) => {
            assert_eq!(stats.top_value.as_deref(), Some("LA"));
            assert_eq!(stats.top_frequency, 2);
        }
        other => panic!("unexpected stats: {:?}", other),
    }
}

#[test]
fn test_outlier_scan() {
    let dataset = load("a,b,label\n1,10,x\n2,10,y\n3,11,z\n4,10,w\n5,12,v\n100,11,u\n");
    let report = outliers(&dataset).unwrap();

    let a = report.outlier_info.get("a").unwrap();
    assert_eq!(a.count, 1);
    assert_eq!(a.lower_bound, Some(-1.5));
    assert_eq!(a.upper_bound, Some(8.5));
    assert_eq!(report.outlier_info.get("b").unwrap().count, 0);
    assert_eq!(report.total_columns_with_outliers, 1);
    assert!(report.outlier_info.get("label").is_none());

    match report.chart {
        Some(Chart::Grid(grid)) => assert_eq!(grid.panels.len(), 1),
        other => panic!("unexpected chart: {:?}", other),
    }

    assert!(matches!(
        outliers(&load("label\nx\n")),
        Err(ProcessingError::NoNumericColumns)
    ));
}

#[test]
fn test_group_by_orders_descending_and_drops_null_keys() {
    let report = group_by(&sales(), &group_request("region", "units", Some("sum"))).unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["data"], json!({"north": 40.0, "east": 40.0, "south": 20.0}));
    let keys: Vec<&str> = report.data.keys().collect();
    assert_eq!(keys, vec!["east", "north", "south"]);
}

#[test]
fn test_group_by_unknown_aggregation_matches_mean() {
    let mean = group_by(&sales(), &group_request("product", "price", Some("mean"))).unwrap();
    let unknown = group_by(&sales(), &group_request("product", "price", Some("variance"))).unwrap();
    let default = group_by(&sales(), &group_request("product", "price", None)).unwrap();

    assert_eq!(mean.data, unknown.data);
    assert_eq!(mean.data, default.data);
    assert_eq!(mean.data.get("plum"), Some(&AggregateValue::Float(Some(5.5))));

    // The chart keeps the requested name even though mean did the work
    let title = |report: &rust_eda_service::processing::GroupByReport| {
        report.chart.as_ref().and_then(Chart::title).map(str::to_string)
    };
    assert_eq!(title(&unknown).as_deref(), Some("Variance of price by product"));
    assert_eq!(title(&default).as_deref(), Some("Mean of price by product"));
}

#[test]
fn test_group_by_validation() {
    let missing = GroupByRequest {
        group_column: Some("region".to_string()),
        value_column: Some(String::new()),
        aggregation: None,
    };
    assert!(matches!(
        group_by(&sales(), &missing),
        Err(ProcessingError::MissingParameters(_))
    ));
    assert!(matches!(
        group_by(&sales(), &group_request("region", "nope", None)),
        Err(ProcessingError::ColumnNotFound(_))
    ));
    assert!(matches!(
        group_by(&sales(), &group_request("region", "product", Some("median"))),
        Err(ProcessingError::NotNumeric(_))
    ));

    let counts = group_by(&sales(), &group_request("region", "product", Some("count"))).unwrap();
    assert_eq!(counts.data.get("north"), Some(&AggregateValue::Count(2)));
}

#[test]
fn test_group_by_truncates_to_twenty_groups() {
    let mut csv = String::from("key,value\n");
    for i in 0..30 {
        csv.push_str(&format!("k{},{}\n", i, i));
    }
    let report = group_by(&load(&csv), &group_request("key", "value", Some("sum"))).unwrap();

    assert_eq!(report.data.len(), 20);
    assert_eq!(report.data.keys().next(), Some("k29"));
}

#[test]
fn test_pages_are_contiguous() {
    let mut csv = String::from("i\n");
    for i in 0..120 {
        csv.push_str(&format!("{}\n", i));
    }
    let dataset = load(&csv);

    let first = page(&dataset, 1, 50).unwrap();
    let second = page(&dataset, 2, 50).unwrap();
    let beyond = page(&dataset, 9, 50).unwrap();

    assert_eq!(first.total_pages, 3);
    assert_eq!(first.data.len(), 50);
    assert_eq!(serde_json::to_value(&first.data[49]).unwrap(), json!({"i": 49}));
    assert_eq!(serde_json::to_value(&second.data[0]).unwrap(), json!({"i": 50}));
    assert!(beyond.data.is_empty());
    assert!(matches!(page(&dataset, 0, 50), Err(ProcessingError::InvalidArgument(_))));
}

#[test]
fn test_page_rows_keep_explicit_nulls() {
    let report = page(&sales(), 1, 50).unwrap();
    let value = serde_json::to_value(&report.data[0]).unwrap();

    assert_eq!(value, json!({"region": "north", "product": "apple", "units": 10.0, "price": 1.5, "note": null}));
}

#[test]
fn test_column_introspection() {
    let info = columns(&sales());

    assert_eq!(info[2].name, "units");
    assert_eq!(info[2].dtype, "float64");
    assert!(info[2].is_numeric);
    assert_eq!(info[2].null_count, 1);
    assert_eq!(info[2].non_null_count, 5);
    assert_eq!(info[1].dtype, "object");
}

#[test]
fn test_missing_analysis() {
    match missing_analysis(&sales()) {
        MissingReport::Missing(summary) => {
            assert_eq!(summary.total_missing, 6);
            assert_eq!(summary.total_missing_percentage, 20.0);
            let order: Vec<&str> = summary.columns_with_missing.keys().collect();
            assert_eq!(order, vec!["note", "region", "units"]);
            assert_eq!(summary.missing_percentages.get("note"), Some(&66.67));
        }
        other => panic!("unexpected report: {:?}", other),
    }

    let complete = load("a\n1\n");
    let report = missing_analysis(&complete);
    assert!(report.chart(&complete).is_none());
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({"message": "No missing values found in the dataset!", "total_missing": 0})
    );
}

#[test]
fn test_scatter_with_hue_and_trend() {
    let request = ScatterRequest {
        x_column: Some("units".to_string()),
        y_column: Some("price".to_string()),
        hue_column: Some("product".to_string()),
    };
    let report = scatter(&sales(), &request).unwrap();

    assert_eq!(report.correlation, Some(1.0));
    match report.chart {
        Some(Chart::Scatter(chart)) => {
            assert_eq!(chart.series.len(), 3);
            assert_eq!(chart.trend.map(|t| t.len()), Some(100));
        }
        other => panic!("unexpected chart: {:?}", other),
    }
}

#[test]
fn test_scatter_categorical_axis_has_no_correlation() {
    let request = ScatterRequest {
        x_column: Some("region".to_string()),
        y_column: Some("price".to_string()),
        hue_column: Some("unknown".to_string()),
    };
    let report = scatter(&sales(), &request).unwrap();

    assert_eq!(report.correlation, None);
    assert!(matches!(
        scatter(&sales(), &ScatterRequest::default()),
        Err(ProcessingError::MissingParameters(_))
    ));
}

#[test]
fn test_pair_plot_uses_first_five_numeric_columns() {
    let dataset = load("a,b,c,d,e,f,g\n1,2,3,4,5,6,x\n2,3,4,5,6,7,y\n");
    let report = pair_plot(&dataset).unwrap();

    assert_eq!(report.columns_used, vec!["a", "b", "c", "d", "e"]);
    match report.chart {
        Some(Chart::Grid(grid)) => assert_eq!(grid.panels.len(), 25),
        other => panic!("unexpected chart: {:?}", other),
    }

    assert!(matches!(
        pair_plot(&load("a,name\n1,x\n")),
        Err(ProcessingError::InsufficientColumns { .. })
    ));
}

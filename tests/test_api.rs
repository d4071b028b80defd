// HTTP API tests
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use actix_web::{http::StatusCode, test, App};
use mockall::mock;
use serde_json::{json, Value as JsonValue};

use rust_eda_service::api::{configure_app, SharedRenderer, SharedStorage};
use rust_eda_service::chart::{Chart, ChartError, ChartImage, ChartRenderer, SvgRenderer};
use rust_eda_service::data;
use rust_eda_service::storage::{DataStorage, MemoryStorage};

const LIMIT: usize = 1024 * 1024;

mock! {
    pub Renderer {}

    impl ChartRenderer for Renderer {
        fn render(&self, chart: &Chart) -> Result<ChartImage, ChartError>;
    }
}

fn storage_with(csv: &str) -> (SharedStorage, String) {
    let storage: SharedStorage = Arc::new(MemoryStorage::new());
    let id = storage
        .register(data::parse(csv.as_bytes(), "fixture.csv").unwrap())
        .unwrap();
    (storage, id)
}

fn svg() -> SharedRenderer {
    Arc::new(SvgRenderer::default())
}

#[actix_web::test]
async fn test_upload_and_describe() {
    let storage: SharedStorage = Arc::new(MemoryStorage::new());
    let app = test::init_service(App::new().configure(configure_app(storage.clone(), svg(), LIMIT))).await;

    let req = test::TestRequest::post()
        .uri("/api/upload?filename=people.csv")
        .set_payload("age,city\n25,NYC\n30,LA\n25,NYC\n")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["rows"], 3);
    assert_eq!(body["columns"], 2);
    assert_eq!(body["filename"], "people.csv");
    assert_eq!(body["column_types"], json!({"age": "int64", "city": "object"}));
    assert_eq!(body["preview"][1], json!({"age": 30, "city": "LA"}));
    assert!(body["memory_usage"].as_str().unwrap().ends_with(" KB"));

    let id = body["file_id"].as_str().unwrap().to_string();
    assert_eq!(storage.list().unwrap(), vec![id.clone()]);

    let req = test::TestRequest::get()
        .uri(&format!("/api/basic-stats/{}", id))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["duplicates"], 1);
    assert_eq!(body["duplicate_percentage"], 33.33);
}

#[actix_web::test]
async fn test_upload_rejections() {
    let storage: SharedStorage = Arc::new(MemoryStorage::new());
    let app = test::init_service(App::new().configure(configure_app(storage.clone(), svg(), LIMIT))).await;

    let cases = [
        ("/api/upload?filename=data.xlsx", "a\n1\n", "File type not allowed. Use CSV or TXT files."),
        ("/api/upload?filename=data.csv", "", "No file provided"),
        ("/api/upload", "a\n1\n", "No file selected"),
    ];

    for (uri, payload, message) in cases {
        let req = test::TestRequest::post().uri(uri).set_payload(payload).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let body: JsonValue = test::read_body_json(resp).await;
        assert_eq!(body["error"], message);
    }

    let req = test::TestRequest::post()
        .uri("/api/upload?filename=long.csv")
        .set_payload("a,b\n1,2\n1,2,3\n")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    assert!(storage.list().unwrap().is_empty());
}

#[actix_web::test]
async fn test_upload_accepts_names_without_ascii_stem() {
    let storage: SharedStorage = Arc::new(MemoryStorage::new());
    let app = test::init_service(App::new().configure(configure_app(storage.clone(), svg(), LIMIT))).await;

    for uri in ["/api/upload?filename=%E6%97%A5%E6%9C%AC.csv", "/api/upload?filename=.csv"] {
        let req = test::TestRequest::post().uri(uri).set_payload("a,b\n1,2\n").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);

        let body: JsonValue = test::read_body_json(resp).await;
        assert_eq!(body["filename"], "upload.csv");
        assert_eq!(body["column_names"], json!(["a", "b"]));
    }

    assert_eq!(storage.list().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_unknown_dataset_is_not_found() {
    let storage: SharedStorage = Arc::new(MemoryStorage::new());
    let app = test::init_service(App::new().configure(configure_app(storage, svg(), LIMIT))).await;

    for uri in ["/api/basic-stats/nope", "/api/correlation/nope", "/api/columns/nope"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: JsonValue = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "File not found"}));
    }
}

#[actix_web::test]
async fn test_unknown_column_is_not_found() {
    let (storage, id) = storage_with("a,b\n1,2\n");
    let app = test::init_service(App::new().configure(configure_app(storage, svg(), LIMIT))).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/distribution/{}/zzz", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Column zzz not found");
}

#[actix_web::test]
async fn test_groupby_requires_parameters() {
    let (storage, id) = storage_with("g,v\na,1\nb,2\na,3\n");
    let app = test::init_service(App::new().configure(configure_app(storage, svg(), LIMIT))).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/groupby/{}", id))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Please provide group_column and value_column");

    let req = test::TestRequest::post()
        .uri(&format!("/api/groupby/{}", id))
        .set_json(json!({"group_column": "g", "value_column": "v", "aggregation": "sum"}))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], json!({"a": 4, "b": 2}));
    assert!(body["chart"].as_str().unwrap().starts_with("data:image/svg+xml;base64,"));
}

#[actix_web::test]
async fn test_correlation_embeds_rendered_heatmap() {
    let (storage, id) = storage_with("x,y\n1,2\n2,4\n3,7\n");

    let mut renderer = MockRenderer::new();
    renderer
        .expect_render()
        .withf(|chart| matches!(chart, Chart::Heatmap(_)))
        .times(1)
        .returning(|_| Ok(ChartImage::new("image/png", vec![1, 2, 3])));
    let renderer: SharedRenderer = Arc::new(renderer);

    let app = test::init_service(App::new().configure(configure_app(storage, renderer, LIMIT))).await;
    let req = test::TestRequest::get()
        .uri(&format!("/api/correlation/{}", id))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["heatmap"], "data:image/png;base64,AQID");
    assert_eq!(body["correlation_matrix"]["x"]["x"], 1.0);
    assert!(body.get("chart").is_none());
}

#[actix_web::test]
async fn test_render_failure_is_internal_error() {
    let (storage, id) = storage_with("v\n1\n2\n3\n");

    let mut renderer = MockRenderer::new();
    renderer
        .expect_render()
        .returning(|_| Err(ChartError::Render("backend unavailable".to_string())));
    let renderer: SharedRenderer = Arc::new(renderer);

    let app = test::init_service(App::new().configure(configure_app(storage, renderer, LIMIT))).await;
    let req = test::TestRequest::get()
        .uri(&format!("/api/distribution/{}/v", id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Render error: backend unavailable");
}

#[actix_web::test]
async fn test_missing_analysis_without_missing_values_skips_chart() {
    let (storage, id) = storage_with("a,b\n1,x\n2,y\n");

    let mut renderer = MockRenderer::new();
    renderer.expect_render().times(0);
    let renderer: SharedRenderer = Arc::new(renderer);

    let app = test::init_service(App::new().configure(configure_app(storage, renderer, LIMIT))).await;
    let req = test::TestRequest::get()
        .uri(&format!("/api/missing-analysis/{}", id))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body,
        json!({"message": "No missing values found in the dataset!", "total_missing": 0, "chart": null})
    );
}

#[actix_web::test]
async fn test_data_preview_pagination() {
    let (storage, id) = storage_with("i,s\n1,a\n2,\n3,c\n");
    let app = test::init_service(App::new().configure(configure_app(storage, svg(), LIMIT))).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/data-preview/{}?page=2&per_page=2", id))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], json!([{"i": 3, "s": "c"}]));
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["total_rows"], 3);

    let req = test::TestRequest::get()
        .uri(&format!("/api/data-preview/{}", id))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["per_page"], 50);
    assert_eq!(body["data"][1], json!({"i": 2, "s": null}));

    let req = test::TestRequest::get()
        .uri(&format!("/api/data-preview/{}?page=0", id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_delete_unregisters_dataset() {
    let (storage, id) = storage_with("a\n1\n");
    let app = test::init_service(App::new().configure(configure_app(storage, svg(), LIMIT))).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/datasets/{}", id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&format!("/api/columns/{}", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/datasets").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"datasets": []}));
}

#[actix_web::test]
async fn test_health() {
    let (storage, _) = storage_with("a\n1\n");
    let app = test::init_service(App::new().configure(configure_app(storage, svg(), LIMIT))).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
}

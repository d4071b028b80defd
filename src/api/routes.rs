// API routes configuration
// Author: Gabriel Demetrios Lafis

use actix_web::{web, HttpResponse, Responder};

use super::handlers;

/// Configure API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Health check
            .route("/health", web::get().to(health_check))

            // Datasets
            .route("/upload", web::post().to(handlers::upload_file))
            .service(
                web::scope("/datasets")
                    .route("", web::get().to(handlers::list_datasets))
                    .route("/{id}", web::delete().to(handlers::delete_dataset)),
            )

            // Analysis
            .route("/basic-stats/{id}", web::get().to(handlers::basic_stats))
            .route("/correlation/{id}", web::get().to(handlers::correlation_analysis))
            .route("/distribution/{id}/{column}", web::get().to(handlers::distribution_analysis))
            .route("/scatter/{id}", web::post().to(handlers::scatter_plot))
            .route("/pairplot/{id}", web::get().to(handlers::pairplot))
            .route("/missing-analysis/{id}", web::get().to(handlers::missing_values))
            .route("/outliers/{id}", web::get().to(handlers::outlier_analysis))
            .route("/groupby/{id}", web::post().to(handlers::groupby_analysis))

            // Browsing
            .route("/data-preview/{id}", web::get().to(handlers::data_preview))
            .route("/columns/{id}", web::get().to(handlers::get_columns)),
    );
}

/// Health check handler
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// API server implementation
// Author: Gabriel Demetrios Lafis

use actix_cors::Cors;
use actix_web::{error, middleware, web, App, HttpServer};
use log::info;

use crate::utils::ServerConfig;
use super::{routes, ApiError, SharedRenderer, SharedStorage};

/// Register shared state, extractor limits and routes on a service config
///
/// Extractor failures (bad JSON, bad query strings) are reported with the same
/// `{"error": ...}` body as handler errors.
pub fn configure_app(
    storage: SharedStorage,
    renderer: SharedRenderer,
    max_upload_bytes: usize,
) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(renderer.clone()))
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .app_data(web::JsonConfig::default().error_handler(|err, _| {
                error::Error::from(ApiError::ValidationError(err.to_string()))
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _| {
                error::Error::from(ApiError::ValidationError(err.to_string()))
            }))
            .configure(routes::configure);
    }
}

/// API server
pub struct Server {
    config: ServerConfig,
    storage: SharedStorage,
    renderer: SharedRenderer,
}

impl Server {
    /// Create a new API server
    pub fn new(storage: SharedStorage, renderer: SharedRenderer, config: ServerConfig) -> Self {
        Server {
            config,
            storage,
            renderer,
        }
    }

    /// Run the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let host = self.config.host.clone();
        let port = self.config.port;
        let enable_cors = self.config.enable_cors;
        let app_config = configure_app(
            self.storage.clone(),
            self.renderer.clone(),
            self.config.max_upload_bytes,
        );

        info!(
            "Starting server at http://{}:{} with {} workers",
            host,
            port,
            self.config.worker_count()
        );

        HttpServer::new(move || {
            App::new()
                .wrap(middleware::Condition::new(enable_cors, Cors::permissive().max_age(3600)))
                .wrap(middleware::Logger::default())
                .configure(app_config.clone())
        })
        .workers(self.config.worker_count())
        .bind((host.as_str(), port))?
        .run()
        .await
    }
}

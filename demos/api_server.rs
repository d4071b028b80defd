// API server example
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use rust_eda_service::{
    api::Server,
    chart::SvgRenderer,
    storage::CacheStorage,
    utils::{init_logging, ServerConfig},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging(log::LevelFilter::Info, None).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    // Keep at most 16 uploads in memory
    let storage = Arc::new(CacheStorage::new(16));
    let renderer = Arc::new(SvgRenderer::default());

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 8080,
        ..ServerConfig::default()
    };

    println!("Starting API server at http://{}:{}", config.host, config.port);
    println!("Press Ctrl+C to stop");

    Server::new(storage, renderer, config).run().await
}

// Rust EDA Service - Main executable
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use anyhow::Context;
use clap::{Arg, Command};
use log::info;

use rust_eda_service::{
    api::{Server, SharedRenderer},
    chart::SvgRenderer,
    utils::{init_logging, Config},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let matches = Command::new("Rust EDA Service")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gabriel Demetrios Lafis")
        .about("Exploratory data analysis over uploaded tabular files")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .subcommand(
            Command::new("server")
                .about("Run the API server")
                .arg(
                    Arg::new("host")
                        .short('H')
                        .long("host")
                        .value_name("HOST")
                        .help("Sets the server host")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Sets the server port")
                        .takes_value(true),
                ),
        )
        .get_matches();

    // Load configuration
    let mut config = match matches.value_of("config") {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => Config::default(),
    };

    init_logging(config.log_level_filter(), config.logging.file.as_deref())
        .context("Failed to initialize logging")?;

    let storage = config.storage.build().context("Failed to create dataset storage")?;
    info!("Using '{}' dataset storage", config.storage.type_);

    // Handle subcommands
    if let Some(matches) = matches.subcommand_matches("server") {
        // Override config with command line arguments
        if let Some(host) = matches.value_of("host") {
            config.server.host = host.to_string();
        }
        if let Some(port) = matches.value_of("port") {
            config.server.port = port
                .parse()
                .with_context(|| format!("Invalid port '{}'", port))?;
        }

        let renderer: SharedRenderer = Arc::new(SvgRenderer::default());
        let server = Server::new(storage, renderer, config.server.clone());
        server.run().await.context("Server terminated with an error")?;
    } else {
        println!("No subcommand specified. Use --help for usage information.");
    }

    Ok(())
}

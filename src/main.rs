use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thumbnail_service::{
    config::Config, storage::LocalThumbnailStore, thumbnails::ThumbnailService, web::WebServer,
};

#[derive(Parser)]
#[command(name = "thumbnail-service")]
#[command(version = "0.1.0")]
#[command(about = "An image thumbnail generation service with preset and custom sizing")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Storage root for generated thumbnails (overrides config file)
    #[arg(short = 's', long, value_name = "PATH")]
    storage_root: Option<PathBuf>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = format!("thumbnail_service={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Thumbnail Service v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration from specified file
    std::env::set_var("CONFIG_FILE", &cli.config);
    let mut config = Config::load()?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(storage_root) = cli.storage_root {
        config.storage.thumbnail_path = storage_root;
    }

    info!(
        "Using storage root: {}",
        config.storage.thumbnail_path.display()
    );

    // Initialize storage and the thumbnail service
    let storage = LocalThumbnailStore::new(config.storage.thumbnail_path.clone());
    storage.ensure_storage_root().await?;

    let thumbnail_service = ThumbnailService::new(
        Arc::new(storage),
        config.thumbnails.clone(),
        &config.web.base_url,
    );
    info!("Thumbnail service and storage initialized");

    let web_server = WebServer::new(config, thumbnail_service)?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    Ok(())
}

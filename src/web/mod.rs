//! Web layer module
//!
//! Thin HTTP interface over the thumbnail pipeline. Handlers decode
//! multipart uploads and query parameters, delegate to the service layer,
//! and let the error type render itself into the JSON error envelope.

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

use crate::{config::Config, thumbnails::ThumbnailService};

pub mod api;
pub mod responses;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub thumbnail_service: ThumbnailService,
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: Config, thumbnail_service: ThumbnailService) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;

        let app = Self::create_router(AppState {
            config,
            thumbnail_service,
        });

        Ok(Self { app, addr })
    }

    /// Create the router with all routes and middleware
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(api::health_check))
            .route("/thumbnails", post(api::upload_thumbnails))
            .route("/thumbnails/:id", get(api::get_thumbnail))
            // Per-image byte limits are enforced by the pipeline, not the
            // transport, so the default multipart body cap is lifted.
            .layer(DefaultBodyLimit::disable())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the retrofit map.
//!
//! Loads the building dataset once at startup (falling back to synthetic
//! data when the configured source fails), then serves filtered subsets,
//! insights and summary statistics over a small JSON API alongside the
//! frontend's static files.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use retrofit_map_analytics::summary;
use retrofit_map_analytics_models::HeadlineStats;
use retrofit_map_config::{AppConfig, MapConfig};
use retrofit_map_dataset::Dataset;
use retrofit_map_spatial::BoundingBox;
use thiserror::Error;

/// Errors that can stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or running the HTTP server failed.
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// The immutable base record collection.
    pub dataset: Arc<Dataset>,
    /// Padded bounds of the full dataset, computed once.
    pub bounds: Option<BoundingBox>,
    /// Stat widgets over the full dataset, computed once.
    pub headline: HeadlineStats,
    /// Clustering parameters for served map sources.
    pub map: MapConfig,
}

impl AppState {
    /// Derives the load-time values (bounds, headline stats) from `dataset`.
    #[must_use]
    pub fn new(dataset: Dataset, map: MapConfig) -> Self {
        let bounds = retrofit_map_spatial::compute_bounds(dataset.records());
        let headline = summary::headline(dataset.records());
        Self {
            dataset: Arc::new(dataset),
            bounds,
            headline,
            map,
        }
    }
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/dataset", web::get().to(handlers::dataset))
            .route("/buildings", web::get().to(handlers::buildings))
            .route("/insights", web::get().to(handlers::insights))
            .route("/summary", web::get().to(handlers::summary))
            .route("/priorities", web::get().to(handlers::priorities)),
    );
}

/// Starts the retrofit map API server.
///
/// Loads the dataset described by `config.dataset`, then binds to
/// `config.server`. This is a regular async function; the caller provides
/// the runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError::Io`] if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: AppConfig) -> Result<(), ServerError> {
    let dataset = retrofit_map_dataset::load(&config.dataset).await;
    if dataset.is_synthetic() {
        log::warn!("Serving {} synthetic buildings", dataset.len());
    }

    let state = web::Data::new(AppState::new(dataset, config.map.clone()));
    let static_dir = config.server.static_dir.clone();
    let serve_static = static_dir.is_dir();
    if !serve_static {
        log::warn!(
            "Static directory {} not found, serving the API only",
            static_dir.display()
        );
    }

    let bind_addr = config.server.bind_addr.clone();
    let port = config.server.port;
    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api);

        if serve_static {
            app.service(Files::new("/", static_dir.clone()).index_file("index.html"))
        } else {
            app
        }
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}

//! Vehicle Health Monitor - Failure Risk Prediction Server
//!
//! Trains a failure-risk classifier on vehicle maintenance records once at
//! startup, then serves inference over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                 VEHICLE HEALTH MONITOR                     │
//! ├────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌───────────────────┐  │
//! │  │  API      │   │  Dataset     │   │  Prediction       │  │
//! │  │  (Axum)   │──▶│  Loader /    │──▶│  Pipeline         │  │
//! │  │           │   │  Cleaner     │   │  (scale+onehot+RF)│  │
//! │  └───────────┘   └──────────────┘   └───────────────────┘  │
//! │        fit once at startup, Arc-shared read-only after     │
//! └────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod dataset;
mod error;
mod handlers;
mod model;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use model::PredictionPipeline;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vehicle_health_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Vehicle Health Monitor starting...");
    tracing::info!("Dataset: {}", config.dataset_path.display());

    // Fit the pipeline once; it is read-only for the rest of the process
    let dataset = dataset::load(&config.dataset_path)
        .with_context(|| format!("loading dataset {}", config.dataset_path.display()))?;
    let pipeline = PredictionPipeline::fit(&dataset, config.forest_params())
        .context("fitting prediction pipeline")?;

    let state = AppState {
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await.context("serving")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PredictionPipeline>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/status", get(handlers::status::get))
        .route("/api/v1/schema", get(handlers::schema::get))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

//! Rating classifier server
//!
//! Loads the model artifact and metadata once, then serves predictions over
//! HTTP. A missing or broken model does not stop the server: `/health`
//! reports unhealthy and `/predict` answers 503.
//!
//! # Usage
//! ```sh
//! MODEL_PATH=models/best_model.json PORT=8000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `MODEL_PATH` - Model artifact (default: models/best_model.json)
//! - `METADATA_PATH` - Metadata document (default: models/best_model_metadata.json)
//! - `HOST` / `PORT` - Listener address (default: 0.0.0.0:8000)
//! - `RUST_LOG` - Log filter (default: info)

use anyhow::Result;
use rating_classifier::application::PredictionService;
use rating_classifier::config::Config;
use rating_classifier::infrastructure::{Metrics, ModelState};
use rating_classifier::interfaces::http::{self, AppState};
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Rating classifier {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: model={:?}, metadata={:?}, bind={}",
        config.model.model_path,
        config.model.metadata_path,
        config.server.bind_address()
    );

    // Blocking one-time load before the listener accepts traffic.
    let state = Arc::new(ModelState::load(&config.model));
    let metrics = Metrics::new()?;
    metrics.set_model_ready(state.is_ready());
    if !state.is_ready() {
        warn!("Model not ready. Serving in degraded mode.");
    }

    let service = PredictionService::new(state, metrics.clone());
    http::serve(AppState::new(service, metrics), &config.server.bind_address()).await?;

    info!("Server stopped.");
    Ok(())
}

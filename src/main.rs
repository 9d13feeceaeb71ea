//! Lungcare prediction service
//!
//! Main entry point for the Lungcare service.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing::{error, info};
use tracing_actix_web::TracingLogger;

use lungcare::api::{self, middleware, AppState};
use lungcare::core::{load_pipeline, PredictionService};
use lungcare::{config, telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = config::load_config().context("Failed to load configuration")?;

    // Initialize logger
    telemetry::init_tracing(&config.log)?;

    // Load the prediction pipeline once; it is shared read-only afterwards
    let predictions = match load_pipeline(&config.pipeline.path) {
        Ok(pipeline) => PredictionService::new(Arc::new(pipeline)),
        Err(e) if config.pipeline.required => {
            return Err(e).context("Failed to load prediction pipeline");
        }
        Err(e) => {
            error!(error = %e, "pipeline unavailable, /predict will answer 500");
            PredictionService::unavailable()
        }
    };

    // Create app state
    let app_state = web::Data::new(AppState::new(predictions, config.pipeline.on_failure));
    let expose_docs = config.server.expose_docs;

    info!(
        host = %config.server.host,
        port = config.server.port,
        expose_docs,
        "starting HTTP server"
    );

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            // Add app state
            .app_data(app_state.clone())
            // Request spans
            .wrap(TracingLogger::default())
            .wrap(middleware::cors())
            // API routes
            .configure(api::configure_with(expose_docs))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}

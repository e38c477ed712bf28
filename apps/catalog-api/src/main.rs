use std::sync::Arc;
use std::time::Duration;

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_catalog::LocalImageStorage;
use tower_http::services::ServeDir;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.environment);

    info!(database = %config.mongodb.database, "Connecting to MongoDB");

    // Connect to MongoDB with retry
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;

    let db = mongo_client.database(&config.mongodb.database);

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database
    );

    // Unique names and titles are enforced by these indexes
    api::catalog::init_indexes(&db).await?;

    let storage = Arc::new(LocalImageStorage::new(
        config.media.upload_dir.clone(),
        config.media.base_url.clone(),
    ));
    info!(
        upload_dir = %config.media.upload_dir.display(),
        base_url = %config.media.base_url,
        "Serving uploaded images at /uploads"
    );

    let state = AppState {
        config,
        mongo_client,
        db,
        storage,
    };

    // Build router with API routes
    let api_routes = api::routes(&state);

    // Create a router with OpenAPI docs
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;

    let AppState {
        config,
        mongo_client,
        ..
    } = state;

    // Merge health endpoints and the uploaded files
    let app = router
        .merge(health_router(config.app))
        .nest_service("/uploads", ServeDir::new(&config.media.upload_dir));

    info!("Starting Catalog API with production-ready shutdown (30s timeout)");

    // Production-ready server with graceful shutdown
    create_production_app(
        app,
        &config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            // MongoDB client closes automatically on drop
            drop(mongo_client);
            info!("MongoDB connection closed successfully");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}

//! QMS API Server
//!
//! Main entry point for the QMS record-keeping backend.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qms_api::{AppState, create_router};
use qms_core::storage::{StorageConfig, StorageProvider, StorageService};
use qms_db::connect;
use qms_shared::config::StorageSettings;
use qms_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qms=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        token_expires_hours: config.jwt.token_expiry_hours,
    });

    // Create storage service
    let storage = StorageService::from_config(storage_config_from(&config.storage)?)?;
    info!(provider = storage.provider_name(), "Storage configured");

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        storage: Arc::new(storage),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the storage configuration from the settings file/environment.
fn storage_config_from(settings: &StorageSettings) -> anyhow::Result<StorageConfig> {
    let provider = match settings.provider.as_str() {
        "s3" => StorageProvider::s3(
            &settings.endpoint,
            &settings.bucket,
            &settings.access_key_id,
            &settings.secret_access_key,
            &settings.region,
        ),
        "azure_blob" => StorageProvider::azure_blob(
            &settings.account,
            &settings.access_key,
            &settings.container,
        ),
        "local_fs" => StorageProvider::local_fs(&settings.root),
        other => anyhow::bail!("unknown storage provider '{other}'"),
    };

    Ok(StorageConfig::new(provider))
}

pub mod api; // HTTP form + JSON API
pub mod config;
pub mod features; // Record → model feature vector
pub mod model; // Artifact loading + regressors
pub mod models; // Patient input types
pub mod predictor;

use tracing_subscriber::EnvFilter;

use crate::api::{ApiContext, ServerError};
use crate::config::{ConfigError, ServiceConfig};
use crate::model::{ModelError, ModelStore};

/// Anything that stops the service before or while it serves.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Model could not be loaded: {0}")]
    Model(#[from] ModelError),
    #[error(transparent)]
    Server(#[from] ServerError),
}

pub async fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let service = ServiceConfig::from_env()?;
    tracing::info!(
        model_path = %service.model_path.display(),
        bind_addr = %service.bind_addr,
        policy = service.alignment_policy.as_str(),
        "Configuration loaded"
    );

    // Load once; every request shares this instance
    let store = ModelStore::load(&service.model_path, service.alignment_policy)?;
    let ctx = ApiContext::new(&store);

    let listener = api::bind(service.bind_addr).await?;
    api::serve(listener, ctx, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        // Without a signal handler, keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

//! Mod36 server
//!
//! Serves the poeticizeText and generateRealityInsight flows and the
//! 36 Realities catalog over HTTP.

use std::sync::Arc;

use axum::Router;
use mod36_core::{FlowError, GenerationBackend};
use mod36_flows::{Mod36Flows, RealityCatalog};
use tokio::net::TcpListener;
use tracing::{info, warn};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;

pub use config::{LogFormat, ServerConfig};
pub use error::{ServerError, ServerResult};

/// Shared, immutable state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub flows: Mod36Flows,
    pub realities: Arc<RealityCatalog>,
}

impl AppState {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Result<Self, FlowError> {
        Ok(Self {
            flows: Mod36Flows::new(backend)?,
            realities: Arc::new(RealityCatalog::load()?),
        })
    }
}

/// Build the application router over `backend`.
pub fn build_app(backend: Arc<dyn GenerationBackend>) -> ServerResult<Router> {
    let state = AppState::new(backend)?;
    Ok(api::build_router(state))
}

/// Run the server until Ctrl-C. Logging must already be initialized.
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    info!(model = %config.llm.model, base_url = %config.llm.base_url, "Starting Mod36 server");

    let backend = mod36_llm::create_backend(config.llm.clone())?;
    let app = build_app(backend)?;

    let listener = TcpListener::bind(config.listen_address()).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

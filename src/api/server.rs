//! Server lifecycle: bind, serve the prediction router, shut down.
//!
//! `serve` runs in the foreground until its shutdown future completes.
//! `start_server_on` spawns the same loop in a background task and hands
//! back a handle with a shutdown channel.

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::api::router::prediction_router;
use crate::api::types::ApiContext;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

/// Session metadata for a running server.
#[derive(Debug, Clone)]
pub struct ServerSession {
    pub session_id: String,
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a server running in a background task.
pub struct PredictionServer {
    pub session: ServerSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl PredictionServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Prediction server shutdown signal sent");
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Serve the prediction router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, ctx: ApiContext, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = prediction_router(ctx);
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Prediction server listening");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Prediction server stopped");
    Ok(())
}

/// Bind `addr` and run the server in a background task.
///
/// Port 0 picks an ephemeral port; the chosen one is in the session.
pub async fn start_server_on(ctx: ApiContext, addr: SocketAddr) -> Result<PredictionServer, ServerError> {
    let listener = bind(addr).await?;
    let local = listener
        .local_addr()
        .map_err(|source| ServerError::Bind { addr, source })?;

    let session = ServerSession {
        session_id: Uuid::new_v4().to_string(),
        server_addr: local.to_string(),
        port: local.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Prediction server received shutdown signal");
        };
        if let Err(e) = serve(listener, ctx, shutdown_signal).await {
            tracing::error!("Prediction server error: {e}");
        }
    });

    Ok(PredictionServer {
        session,
        shutdown_tx: Some(shutdown_tx),
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

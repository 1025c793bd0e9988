use super::shutdown::ShutdownCoordinator;
use axum::Router;
use core_config::server::ServerConfig;
use std::future::IntoFuture;
use std::io;
use tracing::{info, warn};

/// Starts the Axum server and serves until SIGINT/SIGTERM.
///
/// After the signal, in-flight requests get up to
/// `server_config.shutdown_timeout` to finish before the server returns.
///
/// # Errors
/// Returns an error if the listener fails to bind or the server fails
/// while running.
pub async fn create_app(router: Router, server_config: &ServerConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let coordinator = ShutdownCoordinator::default();
    let mut drained = coordinator.subscribe();
    let shutdown_timeout = server_config.shutdown_timeout;

    let signal = coordinator.clone();
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal.wait_for_signal().await });

    let mut server = std::pin::pin!(server.into_future());
    tokio::select! {
        result = &mut server => {
            return result.inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));
        }
        _ = drained.recv() => {}
    }

    info!("Draining in-flight requests (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(result) => {
            info!("Server stopped");
            result.inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e))
        }
        Err(_) => {
            warn!(
                "Graceful shutdown exceeded {:?}, dropping remaining connections",
                shutdown_timeout
            );
            Ok(())
        }
    }
}

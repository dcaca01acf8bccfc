//! API server lifecycle — bind → spawn background task → return a handle
//! with a shutdown channel.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::core_state::CoreState;

/// Handle to a running API server.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Start the API server on the given IP and port (0 = ephemeral).
///
/// Builds the full `api_router` and spawns the axum server in a
/// background tokio task. Returns a handle with the bound address and a
/// shutdown channel.
pub async fn start_api_server(
    core: Arc<CoreState>,
    ip: IpAddr,
    port: u16,
) -> Result<ApiServer, String> {
    let listener = tokio::net::TcpListener::bind(SocketAddr::new(ip, port))
        .await
        .map_err(|e| format!("Failed to bind API server: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    tracing::info!(%addr, "API server binding");

    let app = api_router(core);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_core() -> (Arc<CoreState>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::from_env();
        config.db_path = dir.path().join("clinic.db");
        (CoreState::new(config), dir)
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let (core, _dir) = test_core();
        let mut server = start_api_server(
            core,
            IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            0,
        )
        .await
        .expect("server should start");

        assert!(server.addr.port() > 0);

        // Public directory endpoint answers over real HTTP
        let url = format!("http://127.0.0.1:{}/api/doctor/list", server.addr.port());
        let resp = reqwest::get(&url).await.unwrap();
        assert!(resp.status().is_success());

        // Protected endpoint without a token is rejected
        let url = format!(
            "http://127.0.0.1:{}/api/doctor/appointments",
            server.addr.port()
        );
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status().as_u16(), 401);

        server.shutdown();
        // Give server time to stop
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
}

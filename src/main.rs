//! MediBook server binary: load config, open the database (running
//! migrations), start the API server, and wait for ctrl-c.

use std::net::{IpAddr, Ipv4Addr};

use tracing_subscriber::EnvFilter;

use medibook::api::server::start_api_server;
use medibook::config::Config;
use medibook::core_state::CoreState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("medibook=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        version = medibook::config::APP_VERSION,
        db = %config.db_path.display(),
        "starting MediBook"
    );

    if let Some(parent) = config.db_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::error!("cannot create data directory {}: {e}", parent.display());
            std::process::exit(1);
        }
    }

    // Open once up front so migration failures surface before we bind.
    if let Err(e) = medibook::db::open_database(&config.db_path) {
        tracing::error!("database initialization failed: {e}");
        std::process::exit(1);
    }

    let port = config.port;
    let core = CoreState::new(config);

    let mut server =
        match start_api_server(core, IpAddr::V4(Ipv4Addr::UNSPECIFIED), port).await {
            Ok(server) => server,
            Err(e) => {
                tracing::error!("{e}");
                std::process::exit(1);
            }
        };

    tracing::info!(addr = %server.addr, "MediBook listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("signal handler error: {e}");
    }
    tracing::info!("shutting down");
    server.shutdown();
}

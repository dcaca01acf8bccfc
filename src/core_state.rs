//! Shared application state for the HTTP server.
//!
//! Wrapped in `Arc` at startup; every request opens its own SQLite
//! connection from here (stateless handlers, no connection reuse across
//! requests). The payment gateway clients are constructed once and
//! shared.

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;

use crate::config::Config;
use crate::db::{self, DatabaseError};
use crate::payments::{CheckoutClient, HostedGateway};

pub struct CoreState {
    pub config: Config,
    db_path: PathBuf,
    pub checkout: CheckoutClient,
    pub hosted: HostedGateway,
}

impl CoreState {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            db_path: config.db_path.clone(),
            checkout: CheckoutClient::new(&config.checkout),
            hosted: HostedGateway::new(&config.hosted),
            config,
        })
    }

    /// Open a connection to the application database. Migrations run on
    /// every open and are no-ops once applied.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::open_database(&self.db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_db_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::from_env();
        config.db_path = dir.path().join("clinic.db");

        let core = CoreState::new(config);
        let conn = core.open_db().unwrap();
        assert_eq!(db::count_tables(&conn).unwrap(), 5);
    }
}

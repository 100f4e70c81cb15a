// Legacy MySQL connection setup
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

use crate::config::{SourceConfig, SOURCE_ACQUIRE_TIMEOUT, SOURCE_MAX_CONNECTIONS};
use crate::errors::SourceError;

/// Connect to the legacy database and return a connection pool
///
/// The pool must be closed by the caller once the run is over.
pub async fn connect(config: &SourceConfig) -> Result<MySqlPool, SourceError> {
    let options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database);

    MySqlPoolOptions::new()
        .max_connections(SOURCE_MAX_CONNECTIONS)
        .acquire_timeout(SOURCE_ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await
        .map_err(|e| SourceError::Connection(e.to_string()))
}

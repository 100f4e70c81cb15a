//! Seed Migrate Main Entry Point
//!
//! Copies the rental catalogue of the legacy Vacatia database into Payload
//! CMS. Takes no arguments; configuration comes from the environment.

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenv::dotenv;
use seed_migrate::legacy::{self, MySqlLegacySource};
use seed_migrate::{MigrationExecutor, SeedConfig};
use seed_migrate_repository::PayloadClient;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("seed_migrate=info,seed_migrate_repository=info"));

    let json = env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("🌱 Starting Vacatia to Payload seed");

    let config = SeedConfig::from_env().context("invalid configuration")?;

    info!(
        host = %config.source.host,
        database = %config.source.database,
        "Connecting to legacy database..."
    );
    let pool = match legacy::connect(&config.source).await {
        Ok(pool) => pool,
        Err(e) => {
            error!(error = %e, "Failed to connect to the legacy database");
            return Err(e).context("legacy database unreachable");
        }
    };
    info!("✓ Connected to legacy database");

    let admin_url = config.target.base_url.join("admin").ok();
    let client = match PayloadClient::new(config.target) {
        Ok(client) => client,
        Err(e) => {
            pool.close().await;
            error!(error = %e, "Failed to build the Payload client");
            return Err(e).context("content store unavailable");
        }
    };

    let executor = MigrationExecutor::new(
        Arc::new(MySqlLegacySource::new(pool.clone())),
        Arc::new(client),
    );
    let result = executor.execute().await;

    // Released on success and failure alike
    pool.close().await;

    match result {
        Ok(summary) => {
            summary.log();
            if let Some(url) = admin_url {
                info!("Review the seeded content at {}", url);
            }
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Seed aborted");
            Err(e).context("seed aborted")
        }
    }
}

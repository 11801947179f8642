//! Mobile Operator Back Office - API Server Binary
//!
//! This binary starts the HTTP API that serves the debtor report.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin operator-api
//!
//! # Run with environment variables
//! API_PORT=8080 API_DATABASE_URL=postgres://... API_REDIS_URL=redis://... cargo run --bin operator-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_REDIS_URL` - Redis connection string
//! * `API_CACHE_KEY` - Key of the debtor snapshot (default: debtors_cache)
//! * `API_CACHE_TTL_SECS` - Snapshot lifetime in seconds (default: 3600)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{Clock, HealthCheckable, SystemClock};
use domain_reporting::{DebtorReportCache, DebtorReportService};
use infra_cache::{RedisCacheConfig, RedisCacheStore};
use infra_db::adapters::PostgresBillingStore;
use infra_db::repositories::SubscriberRepository;
use infra_db::{create_pool, DatabaseConfig};
use interface_api::{config::ApiConfig, create_router, AppState};

/// Main entry point for the API server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - Database connection or schema setup fails
/// - The Redis URL is invalid
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("loading API configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        cache_key = %config.cache_key,
        cache_ttl_secs = config.cache_ttl_secs,
        "Starting operator API server"
    );

    let pool = create_pool(DatabaseConfig::new(config.database_url.clone()))
        .await
        .context("connecting to the billing database")?;

    SubscriberRepository::new(pool.clone())
        .ensure_schema()
        .await
        .context("applying the subscriber schema")?;
    tracing::info!("Database ready");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let billing = Arc::new(PostgresBillingStore::with_clock(pool, clock.clone()));
    let cache_store = Arc::new(
        RedisCacheStore::new(&RedisCacheConfig::new(config.redis_url.clone()))
            .context("configuring the Redis cache")?,
    );

    let cache = DebtorReportCache::new(cache_store.clone(), config.cache_config());
    let service = DebtorReportService::new(billing.clone(), cache, clock);
    let dependencies: Vec<Arc<dyn HealthCheckable>> = vec![
        billing as Arc<dyn HealthCheckable>,
        cache_store as Arc<dyn HealthCheckable>,
    ];

    let app = create_router(AppState::new(service, dependencies));

    let addr: SocketAddr = config.server_addr().parse().context("parsing server address")?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

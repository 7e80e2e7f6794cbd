//! people-registry server.
//!
//! Configuration comes from the environment (and `.env` when present); see
//! [`people_registry::config`] for the variables.

use std::sync::Arc;

use anyhow::Context;
use people_core::PersonService;
use people_enrichment::NameLookupClient;
use people_postgres::{connect, mask_database_url, run_migrations, PgPersonStore};
use people_registry::{build_router, telemetry, AppConfig, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    telemetry::init();

    tracing::debug!(
        database = %mask_database_url(&config.database.database_url),
        pool_size = config.database.max_connections,
        agify = %config.enrichment.agify_url,
        genderize = %config.enrichment.genderize_url,
        nationalize = %config.enrichment.nationalize_url,
        "configuration loaded"
    );

    let pool = connect(&config.database)
        .await
        .context("failed to connect to database")?;

    if config.run_migrations {
        run_migrations(&pool)
            .await
            .context("failed to run migrations")?;
    }

    let lookup = NameLookupClient::new(config.enrichment.clone())?;
    let store = PgPersonStore::new(pool.clone());
    let service = PersonService::new(Arc::new(store), Arc::new(lookup));

    let app = build_router(AppState::new(service));

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;
    tracing::info!("people-registry listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received, draining connections");
}

//! people_postgres — PostgreSQL adapter for the person registry.
//!
//! - [`store::PgPersonStore`]: transactional `PersonStore` over `people` / `info` / `countries`
//! - [`query`]: filter and pagination composer for listings
//! - connection pooling and embedded migrations

pub mod query;
pub mod rows;
pub mod store;

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

pub use store::PgPersonStore;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
    pub idle_timeout: Option<Duration>,
}

impl DatabaseConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 5,
            connection_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
        }
    }
}

/// Open a connection pool.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        "Connecting to database: {}",
        mask_database_url(&config.database_url)
    );

    let mut pool_options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connection_timeout);

    if let Some(idle_timeout) = config.idle_timeout {
        pool_options = pool_options.idle_timeout(idle_timeout);
    }

    let pool = pool_options
        .connect(&config.database_url)
        .await
        .inspect_err(|e| warn!("Failed to connect to database: {}", e))?;

    info!("Database connection pool created");
    Ok(pool)
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database schema up to date");
    Ok(())
}

/// Connection string safe to log: the password becomes `***`. Strings that
/// do not parse as URLs keep at most ten characters at each end.
pub fn mask_database_url(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => {
            let chars: Vec<char> = url.chars().collect();
            if chars.len() > 20 {
                let head: String = chars[..10].iter().collect();
                let tail: String = chars[chars.len() - 10..].iter().collect();
                format!("{head}***{tail}")
            } else {
                "***".to_string()
            }
        }
    }
}

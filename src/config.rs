//! Environment configuration.
//!
//! `DATABASE_URL` wins; otherwise the URL is assembled from the
//! `POSTGRES_HOST` / `POSTGRES_PORT` / `POSTGRES_USER` / `POSTGRES_PASSWORD` /
//! `POSTGRES_DB` variables.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use people_enrichment::LookupEndpoints;
use people_postgres::DatabaseConfig;

const DEFAULT_PORT: u16 = 8084;
const DEFAULT_POOL_SIZE: u32 = 5;
const DEFAULT_ENRICHMENT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database: DatabaseConfig,
    pub run_migrations: bool,
    pub enrichment: LookupEndpoints,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(&std::env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;

        let database_url = match get("DATABASE_URL") {
            Some(url) => url.to_string(),
            None => postgres_url_from_parts(&get)?,
        };
        let mut database = DatabaseConfig::new(database_url);
        database.max_connections =
            parse_or(get("DATABASE_POOL_SIZE"), "DATABASE_POOL_SIZE", DEFAULT_POOL_SIZE)?;

        let run_migrations = parse_bool(get("RUN_MIGRATIONS"), "RUN_MIGRATIONS", true)?;

        let mut enrichment = LookupEndpoints::default();
        if let Some(url) = get("AGIFY_URL") {
            enrichment.agify_url = url.to_string();
        }
        if let Some(url) = get("GENDERIZE_URL") {
            enrichment.genderize_url = url.to_string();
        }
        if let Some(url) = get("NATIONALIZE_URL") {
            enrichment.nationalize_url = url.to_string();
        }
        enrichment.api_key = get("ENRICHMENT_API_KEY").map(str::to_string);
        enrichment.timeout = Duration::from_secs(parse_or(
            get("ENRICHMENT_TIMEOUT_SECS"),
            "ENRICHMENT_TIMEOUT_SECS",
            DEFAULT_ENRICHMENT_TIMEOUT_SECS,
        )?);

        Ok(Self {
            port,
            database,
            run_migrations,
            enrichment,
        })
    }
}

fn postgres_url_from_parts<'a>(get: &impl Fn(&str) -> Option<&'a str>) -> Result<String> {
    let host = get("POSTGRES_HOST")
        .ok_or_else(|| anyhow!("DATABASE_URL or POSTGRES_HOST must be set"))?;
    let port: u16 = parse_or(get("POSTGRES_PORT"), "POSTGRES_PORT", 5432)?;
    let user = get("POSTGRES_USER").context("POSTGRES_USER must be set")?;
    let db = get("POSTGRES_DB").context("POSTGRES_DB must be set")?;

    let mut url = url::Url::parse(&format!("postgres://{host}:{port}/"))
        .with_context(|| format!("invalid POSTGRES_HOST: {host}"))?;
    url.set_path(db);
    url.set_username(user)
        .map_err(|_| anyhow!("invalid POSTGRES_USER"))?;
    if let Some(password) = get("POSTGRES_PASSWORD") {
        url.set_password(Some(password))
            .map_err(|_| anyhow!("invalid POSTGRES_PASSWORD"))?;
    }
    url.query_pairs_mut().append_pair("sslmode", "disable");
    Ok(url.to_string())
}

fn parse_or<T>(value: Option<&str>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|e| anyhow!("invalid {key} value '{v}': {e}")),
    }
}

fn parse_bool(value: Option<&str>, key: &str, default: bool) -> Result<bool> {
    match value.map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(anyhow!("invalid {key} value '{other}'")),
    }
}

//! Settings read from the environment (and `.env` when present).

use crate::error::AppError;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreKind::Postgres),
            "memory" | "mem" => Ok(StoreKind::Memory),
            other => Err(AppError::Config(format!("STORE: unknown store '{}'", other))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub request_body_limit: usize,
    pub auto_create_database: bool,
    pub store: StoreKind,
}

impl Settings {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        Ok(Settings {
            database_url: get("DATABASE_URL", "postgres://localhost/products"),
            bind_addr: get("BIND_ADDR", "0.0.0.0:3000"),
            db_max_connections: parse("DB_MAX_CONNECTIONS", &get("DB_MAX_CONNECTIONS", "5"))?,
            db_acquire_timeout: Duration::from_secs(parse(
                "DB_ACQUIRE_TIMEOUT_SECS",
                &get("DB_ACQUIRE_TIMEOUT_SECS", "5"),
            )?),
            request_body_limit: parse("REQUEST_BODY_LIMIT", &get("REQUEST_BODY_LIMIT", "65536"))?,
            auto_create_database: parse("AUTO_CREATE_DATABASE", &get("AUTO_CREATE_DATABASE", "true"))?,
            store: get("STORE", "postgres").parse()?,
        })
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{}: invalid value '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let s = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(s.bind_addr, "0.0.0.0:3000");
        assert_eq!(s.db_max_connections, 5);
        assert_eq!(s.db_acquire_timeout, Duration::from_secs(5));
        assert_eq!(s.request_body_limit, 65536);
        assert!(s.auto_create_database);
        assert_eq!(s.store, StoreKind::Postgres);
    }

    #[test]
    fn overrides_are_read() {
        let s = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/catalog"),
            ("DB_MAX_CONNECTIONS", "20"),
            ("STORE", "memory"),
            ("AUTO_CREATE_DATABASE", "false"),
        ]))
        .unwrap();
        assert_eq!(s.database_url, "postgres://db/catalog");
        assert_eq!(s.db_max_connections, 20);
        assert_eq!(s.store, StoreKind::Memory);
        assert!(!s.auto_create_database);
    }

    #[test]
    fn bad_number_is_config_error() {
        let err = Settings::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "many")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn unknown_store_is_config_error() {
        assert!(Settings::from_lookup(lookup(&[("STORE", "redis")])).is_err());
    }
}

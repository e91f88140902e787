//! Server Configuration
//!
//! Loads configuration from environment variables.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::warn;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/echo_chamber_network";
const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:3001")
    pub bind_address: String,

    /// Backing store connection URL (`PostgreSQL` URL or `memory://`)
    pub database_url: String,

    /// Upper bound on pooled `PostgreSQL` connections
    pub max_connections: u32,
}

/// Which persistence backend a connection URL selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port: u16 = parse_or_default(&lookup, "PORT", DEFAULT_PORT);

        Self {
            bind_address: format!("{host}:{port}"),
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            max_connections: parse_or_default(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            ),
        }
    }

    /// Backend selected by `database_url`.
    #[must_use]
    pub fn store_backend(&self) -> StoreBackend {
        let url = self.database_url.trim();
        if url == "memory" || url.starts_with("memory://") {
            StoreBackend::Memory
        } else {
            StoreBackend::Postgres
        }
    }

    /// Create a default configuration for testing.
    ///
    /// Uses the in-memory store so no database is required.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".into(),
            database_url: "memory://".into(),
            max_connections: 1,
        }
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!(key, value = %raw, error = %e, "Invalid value, using default {default}");
            default
        }),
        None => default,
    }
}

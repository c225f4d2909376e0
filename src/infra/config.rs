//! Centralized configuration (environment variables + defaults).
//!
//! Read once at start-up and handed to the components that need it; nothing else in the crate
//! looks at the environment.

use anyhow::{anyhow, Context};
use std::fmt;
use std::path::PathBuf;
use subtle::ConstantTimeEq;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DOCUMENTATION_PATH: &str = "documentation.json";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// `DATABASE_URL` value that selects the in-memory store.
pub const MEMORY_DATABASE_URL: &str = "memory";

/// Shared secret that authorizes deletes.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Constant-time comparison, so response timing does not reveal key prefixes.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub api_key: ApiKey,
    pub bind_addr: String,
    pub documentation_path: PathBuf,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| {
            anyhow!("DATABASE_URL must be set (use '{}' for the in-memory store)", MEMORY_DATABASE_URL)
        })?;

        let api_key = lookup("CAFE_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow!("CAFE_API_KEY must be set to a non-empty value"))?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS must be a valid u32, got '{}'", raw))?
                .max(1),
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            max_connections,
            api_key: ApiKey::new(api_key),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            documentation_path: lookup("DOCUMENTATION_PATH")
                .unwrap_or_else(|| DEFAULT_DOCUMENTATION_PATH.to_string())
                .into(),
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }
}

//! Server configuration loaded from environment variables.

use std::path::PathBuf;

use anyhow::Result;
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::db::{self, Database};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Interface to bind (from ROOMLEDGER_HOST)
    pub host: String,
    /// Port for the HTTP API (from ROOMLEDGER_PORT)
    pub port: u16,
    /// SQLite file (from ROOMLEDGER_DB). Falls back to the platform data dir.
    pub db_path: Option<PathBuf>,
    /// Allowed CORS origins (from ROOMLEDGER_CORS_ORIGINS, comma-separated).
    /// Any origin is allowed when unset.
    pub cors_origins: Option<Vec<String>>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("ROOMLEDGER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = lookup("ROOMLEDGER_PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let db_path = lookup("ROOMLEDGER_DB").map(PathBuf::from);

        let cors_origins = lookup("ROOMLEDGER_CORS_ORIGINS").map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Self {
            host,
            port,
            db_path,
            cors_origins,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn open_database(&self) -> Result<Database> {
        let path = match &self.db_path {
            Some(path) => path.clone(),
            None => db::default_path()?,
        };
        Database::open(path)
    }

    pub fn cors_layer(&self) -> CorsLayer {
        match &self.cors_origins {
            Some(origins) => {
                let origins: Vec<HeaderValue> = origins
                    .iter()
                    .filter_map(|o| match o.parse() {
                        Ok(value) => Some(value),
                        Err(_) => {
                            tracing::warn!("Ignoring invalid CORS origin: {}", o);
                            None
                        }
                    })
                    .collect();
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
            None => CorsLayer::permissive(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: None,
            cors_origins: None,
        }
    }
}

//! Environment configuration
//!
//! Everything has a default so the server starts with no environment at all
//! (SQLite under `data/`, port 8080).

use anyhow::{bail, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub backend: BackendKind,
    pub database_path: String,
    pub redis_url: String,
}

/// Which storage backend serves this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    Redis,
}

impl std::str::FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(BackendKind::Sqlite),
            "redis" => Ok(BackendKind::Redis),
            other => bail!("unknown storage backend {other:?} (expected \"sqlite\" or \"redis\")"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Config> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let backend: BackendKind = std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "sqlite".to_string())
            .parse()?;

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| data_dir.join("shelf.db").to_string_lossy().to_string());

        let redis_url = std::env::var("REDIS_URL").unwrap_or_else(|_| {
            let host = std::env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = std::env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
            redis_url_from_parts(&host, &port, std::env::var("REDIS_PASSWORD").ok().as_deref())
        });

        Ok(Config {
            bind_address,
            backend,
            database_path,
            redis_url,
        })
    }
}

fn redis_url_from_parts(host: &str, port: &str, password: Option<&str>) -> String {
    match password {
        Some(password) => format!("redis://:{password}@{host}:{port}"),
        None => format!("redis://{host}:{port}"),
    }
}

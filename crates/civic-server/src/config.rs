use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_AUTHORITY_EMAIL: &str = "admin@municipalcorp.gov.in";
pub const DEFAULT_AUTHORITY_PASSWORD: &str = "password";

/// Server settings, read from `CIVIC_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub upload_dir: PathBuf,
    pub public_dir: PathBuf,
    /// Account seeded into `authorities` at startup if missing.
    pub authority_email: String,
    pub authority_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        let port = var("CIVIC_PORT", "3000");
        let port: u16 = port
            .parse()
            .with_context(|| format!("CIVIC_PORT is not a valid port: {}", port))?;

        Ok(Self {
            host: var("CIVIC_HOST", "0.0.0.0"),
            port,
            db_path: var("CIVIC_DB_PATH", "data.db").into(),
            upload_dir: var("CIVIC_UPLOAD_DIR", "./uploads").into(),
            public_dir: var("CIVIC_PUBLIC_DIR", "./public").into(),
            authority_email: var("CIVIC_AUTHORITY_EMAIL", DEFAULT_AUTHORITY_EMAIL),
            authority_password: var("CIVIC_AUTHORITY_PASSWORD", DEFAULT_AUTHORITY_PASSWORD),
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .with_context(|| format!("invalid listen address: {}", addr))
    }
}

//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_NARRATIVE_TIMEOUT_MS: u64 = 2000;

/// Settings for one server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Events go to PostgreSQL when set, otherwise stay in memory.
    pub database_url: Option<String>,
    /// Directory of authored `*.json` packages loaded after the tutorial.
    pub content_dir: Option<PathBuf>,
    /// Bound on a narrative-provider call.
    ///
    /// Applies only when `build_engine` is given a provider. The server binary
    /// passes none and narrates with the authored fallback text.
    pub narrative_timeout: Duration,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` or `NARRATIVE_TIMEOUT_MS` does
    /// not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };
        let timeout_ms = match non_empty("NARRATIVE_TIMEOUT_MS") {
            Some(raw) => raw.parse().map_err(|e| {
                AppError::Config(format!("NARRATIVE_TIMEOUT_MS must be milliseconds: {e}"))
            })?,
            None => DEFAULT_NARRATIVE_TIMEOUT_MS,
        };

        Ok(Self {
            host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
            database_url: non_empty("DATABASE_URL"),
            content_dir: non_empty("CONTENT_DIR").map(PathBuf::from),
            narrative_timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for an unparsable host.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

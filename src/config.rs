//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before anything
//! else runs. Both binaries (`wordle-pb` and `admin`) share it.
//!
//! ```bash
//! export APP_ENV="development"
//! export LISTEN="127.0.0.1:5173"
//! export STATIC_DIR="build"
//! export DEV_CONFIG="devserver.toml"
//! export POCKETBASE_URL="http://127.0.0.1:5173/"
//! ```
//!
//! ## Optional Variables
//!
//! - `APP_ENV` - `development` or `production` (default: `development`);
//!   the proxy only runs in development
//! - `LISTEN` - Bind address (default: `127.0.0.1:5173`)
//! - `STATIC_DIR` - Built frontend served for non-proxied paths (default: `build`)
//! - `DEV_CONFIG` - TOML file with plugins and proxy rules (default: built-in rules)
//! - `POCKETBASE_URL` - Base location of the record store as seen by the
//!   client; the app's own origin (default: `http://127.0.0.1:5173/`)
//! - `HTTP_TIMEOUT_SECONDS` - Client timeout (default: 30)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn is_development(self) -> bool {
        self == AppEnv::Development
    }
}

impl FromStr for AppEnv {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnv::Development),
            "production" | "prod" => Ok(AppEnv::Production),
            other => anyhow::bail!("APP_ENV must be 'development' or 'production', got '{other}'"),
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppEnv::Development => f.write_str("development"),
            AppEnv::Production => f.write_str("production"),
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_env: AppEnv,
    pub listen_addr: String,
    pub static_dir: PathBuf,
    /// Path of the TOML dev config; `None` uses the built-in defaults.
    pub dev_config_path: Option<PathBuf>,
    pub pocketbase_url: String,
    pub http_timeout_seconds: u64,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `APP_ENV` holds an unknown mode.
    pub fn from_env() -> Result<Self> {
        let app_env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .parse::<AppEnv>()
            .context("Failed to load APP_ENV")?;

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:5173".to_string());
        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("build"));
        let dev_config_path = env::var("DEV_CONFIG")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let pocketbase_url =
            env::var("POCKETBASE_URL").unwrap_or_else(|_| "http://127.0.0.1:5173/".to_string());

        let http_timeout_seconds = env::var("HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            app_env,
            listen_addr,
            static_dir,
            dev_config_path,
            pocketbase_url,
            http_timeout_seconds,
            log_level,
            log_format,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - `pocketbase_url` is not an `http`/`https` URL
    /// - `http_timeout_seconds` is 0
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        let url = url::Url::parse(&self.pocketbase_url)
            .with_context(|| format!("POCKETBASE_URL is not a valid URL: '{}'", self.pocketbase_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!(
                "POCKETBASE_URL must start with 'http://' or 'https://', got '{}'",
                self.pocketbase_url
            );
        }

        if self.http_timeout_seconds == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECONDS must be greater than 0");
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Mode: {}", self.app_env);
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Static dir: {}", self.static_dir.display());
        match &self.dev_config_path {
            Some(path) => tracing::info!("  Dev config: {}", path.display()),
            None => tracing::info!("  Dev config: built-in defaults"),
        }
        tracing::info!(
            "  PocketBase: {}",
            redact_backend_url(&self.pocketbase_url)
        );
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// `POCKETBASE_URL` as shown in logs, with any userinfo password replaced
/// by `***`.
fn redact_backend_url(raw: &str) -> String {
    let Ok(mut url) = url::Url::parse(raw) else {
        return "<invalid url>".to_string();
    };
    if url.password().is_some() && url.set_password(Some("***")).is_err() {
        return "<invalid url>".to_string();
    }
    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// Expects `.env` to be loaded already (e.g. via `dotenvy::dotenv()`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

//! Declarative build and development-server configuration.
//!
//! The file has two top-level sections: the list of active build plugins and
//! a `server.proxy` map from path prefixes to upstream targets.
//!
//! ```toml
//! plugins = ["tailwindcss", "sveltekit"]
//!
//! # In development the dev server answers first, so these rules apply there.
//! # In production the backend serves the built assets and they are ignored.
//! [server.proxy."/api"]
//! target = "http://localhost:5555"
//!
//! [server.proxy."/_"]
//! target = "http://localhost:5555"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Upstream the default proxy rules point at: the locally running backend.
pub const DEFAULT_BACKEND_TARGET: &str = "http://localhost:5555";

#[derive(Debug, Error)]
pub enum DevConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse dev config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid dev config: {0}")]
    Invalid(String),
}

/// Build plugins the frontend toolchain enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plugin {
    Tailwindcss,
    Sveltekit,
}

impl Plugin {
    pub fn name(self) -> &'static str {
        match self {
            Plugin::Tailwindcss => "tailwindcss",
            Plugin::Sveltekit => "sveltekit",
        }
    }
}

/// One `server.proxy` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProxyTarget {
    pub target: Url,
    /// Rewrite the `Host` header to the target's authority. Off by default:
    /// the upstream sees the host the browser used.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub change_origin: bool,
}

impl ProxyTarget {
    pub fn new(target: Url) -> Self {
        Self {
            target,
            change_origin: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default)]
    pub proxy: BTreeMap<String, ProxyTarget>,
}

/// The whole configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevConfig {
    #[serde(default)]
    pub plugins: Vec<Plugin>,
    #[serde(default)]
    pub server: ServerSection,
}

impl Default for DevConfig {
    /// Tailwind and SvelteKit plugins; `/api` and `/_` proxied to the local
    /// backend on port 5555.
    fn default() -> Self {
        let backend = Url::parse(DEFAULT_BACKEND_TARGET).expect("default backend target is valid");

        let mut proxy = BTreeMap::new();
        proxy.insert("/api".to_string(), ProxyTarget::new(backend.clone()));
        proxy.insert("/_".to_string(), ProxyTarget::new(backend));

        Self {
            plugins: vec![Plugin::Tailwindcss, Plugin::Sveltekit],
            server: ServerSection { proxy },
        }
    }
}

impl DevConfig {
    /// Reads, parses and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`DevConfigError::Io`] if the file cannot be read,
    /// [`DevConfigError::Parse`] on malformed TOML or unknown keys/plugins, and
    /// [`DevConfigError::Invalid`] if validation fails.
    pub fn load(path: &Path) -> Result<Self, DevConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DevConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, DevConfigError> {
        let config: DevConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns [`DevConfig::default`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, DevConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DevConfigError::Invalid`] if:
    /// - a plugin is listed twice
    /// - a proxy prefix is empty or does not start with `/`
    /// - a proxy target is not a plain `http` URL with a host
    pub fn validate(&self) -> Result<(), DevConfigError> {
        let mut seen = HashSet::new();
        for plugin in &self.plugins {
            if !seen.insert(plugin) {
                return Err(DevConfigError::Invalid(format!(
                    "plugin '{}' is listed more than once",
                    plugin.name()
                )));
            }
        }

        for (prefix, target) in &self.server.proxy {
            if !prefix.starts_with('/') {
                return Err(DevConfigError::Invalid(format!(
                    "proxy prefix must start with '/', got '{prefix}'"
                )));
            }

            let url = &target.target;
            if url.scheme() != "http" {
                return Err(DevConfigError::Invalid(format!(
                    "proxy target for '{prefix}' must be an http URL, got '{url}'"
                )));
            }
            if url.host_str().is_none() {
                return Err(DevConfigError::Invalid(format!(
                    "proxy target for '{prefix}' has no host"
                )));
            }
        }

        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

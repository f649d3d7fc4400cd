//! Development server: build configuration and the path-prefix proxy.
//!
//! In development, requests whose path starts with a configured prefix
//! (`/api` and `/_` by default) are forwarded to the locally running backend;
//! everything else is served from the static directory. In production the
//! proxy table is empty and the backend serves the built assets itself.
//!
//! # Modules
//!
//! - [`config`] - Declarative plugin list and `server.proxy` map (TOML)
//! - [`proxy`] - Prefix rule table
//! - [`forward`] - Forwarding middleware

pub mod config;
pub mod forward;
pub mod proxy;

pub use config::{DevConfig, DevConfigError, Plugin, ProxyTarget, ServerSection};
pub use proxy::{ProxyRule, ProxyTable};

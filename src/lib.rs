//! # wordle-pb
//!
//! Typed client, development proxy and data tooling for a word guessing game
//! backed by a PocketBase record store.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - `Category`/`Word` record shapes and the
//!   known collection catalogue
//! - **Infrastructure Layer** ([`infrastructure`]) - Typed PocketBase facade
//!   with a process-wide client instance
//! - **Application Layer** ([`application`]) - Category import and numeric
//!   category generation
//! - **Dev Server** ([`devserver`], [`routes`], [`server`]) - Build plugin
//!   declarations and the `/api` + `/_` proxy to the local backend
//!
//! ## Quick Start
//!
//! ```bash
//! # Backend on :5555, dev server on :5173 proxying /api and /_ to it
//! cargo run
//!
//! # Seed the numeric categories
//! cargo run --bin admin -- generate numbers --out imports
//! cargo run --bin admin -- import --dir imports
//! ```
//!
//! ## Configuration
//!
//! Runtime settings come from environment variables via [`config::Config`];
//! plugins and proxy rules from [`devserver::DevConfig`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod middleware;
pub mod state;

pub mod config;
pub mod devserver;
pub mod server;
pub mod telemetry;

pub mod routes;

pub use error::AppError;
pub use state::DevState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ImportReport, ImportService};
    pub use crate::devserver::{DevConfig, ProxyTable};
    pub use crate::domain::collection::{Collection, CollectionRecord};
    pub use crate::domain::entities::{Category, NewCategory, NewWord, Record, Word};
    pub use crate::error::AppError;
    pub use crate::infrastructure::pocketbase::{
        ClientError, CollectionHandle, ListOptions, PocketBase, RecordService,
    };
    pub use crate::state::DevState;
}

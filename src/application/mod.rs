//! Application layer services built on the typed record-store facade.
//!
//! # Available Services
//!
//! - [`services::ImportService`] - Category and word import from JSON files
//! - [`services::number_generator`] - Numeric category generation

pub mod services;

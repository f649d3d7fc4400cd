//! Domain layer: record shapes and the known collection catalogue.
//!
//! # Architecture
//!
//! - [`entities`] - Category, Word and untyped records
//! - [`collection`] - Known collection names and the [`collection::CollectionRecord`]
//!   trait binding a record type to its collection
//!
//! The domain layer has no dependency on the HTTP client; the typed facade in
//! [`crate::infrastructure::pocketbase`] builds on these types.

pub mod collection;
pub mod entities;

//! Record shapes stored in the backend collections.
//!
//! Entities are plain serde structures without behaviour. The backend store
//! creates, mutates and deletes them; this crate only describes their shape.
//!
//! # Entity Types
//!
//! - [`Category`] - A named pool of words (`categories` collection)
//! - [`Word`] - A guessable answer referencing its category (`words` collection)
//! - [`Record`] - Untyped record for any other collection
//!
//! Creation inputs live next to their entity (`NewCategory`, `NewWord`),
//! and [`CategoryImport`] describes the JSON files the importer reads.

pub mod category;
pub mod import;
pub mod record;
pub mod word;

pub use category::{Category, NewCategory};
pub use import::{CategoryImport, WordImport};
pub use record::Record;
pub use word::{NewWord, Word};

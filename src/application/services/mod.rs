//! Application services orchestrating the record-store client.
//!
//! - [`ImportService`] - Creates categories and words from JSON import files
//! - [`number_generator`] - Builds the numeric "Intle"/"Floatle" import files
//! - [`wikipedia_generator`] - Samples the "Wikipedle" import from a title dump

pub mod import_service;
pub mod number_generator;
pub mod wikipedia_generator;

pub use import_service::{
    ImportError, ImportOutcome, ImportReport, ImportService, import_collections_file,
};

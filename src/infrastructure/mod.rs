//! Infrastructure layer: clients for external services.
//!
//! # Modules
//!
//! - [`pocketbase`] - Typed facade and HTTP transport for the record store
//!
//! The backend itself (storage, auth, realtime) runs as a separate process;
//! nothing here reimplements it.

pub mod pocketbase;

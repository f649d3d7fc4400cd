//! HTTP middleware shared by the dev server.

pub mod tracing;

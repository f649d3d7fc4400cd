//! Top-level router of the dev server.
//!
//! # Request Flow
//!
//! 1. **Tracing** - One span per request, tagged proxy or static
//! 2. **Proxy** - Paths matching a `server.proxy` prefix go to the backend
//! 3. **Static files** - Everything else is served from the static directory,
//!    falling back to `index.html` for client-side routes

use axum::{Router, middleware};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};

use crate::devserver::forward;
use crate::middleware::tracing;
use crate::state::DevState;

/// Constructs the dev server router.
///
/// # Arguments
///
/// - `state` - proxy table and HTTP client
/// - `static_dir` - directory holding the built frontend
pub fn app_router(state: DevState, static_dir: &Path) -> Router {
    let assets = ServeDir::new(static_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(static_dir.join("index.html")));

    let proxy = Arc::clone(&state.proxy);

    Router::new()
        .fallback_service(assets)
        .layer(middleware::from_fn_with_state(state, forward::layer))
        .layer(tracing::layer(proxy))
}

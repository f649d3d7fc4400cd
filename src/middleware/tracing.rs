//! Request tracing for the dev server.
//!
//! Every request gets an `INFO` span tagged with where it is routed:
//! `route="proxy"` with the matched prefix and upstream target, or
//! `route="static"` for files served from the build directory. Responses
//! log status and latency in milliseconds inside that span, so a `502` from
//! an unreachable backend shows next to the upstream it was sent to.
//!
//! ```text
//! INFO request{method=GET uri=/api/collections/words/records route="proxy" prefix=/api upstream=http://localhost:5555/}: finished processing request latency=4 ms status=200
//! INFO request{method=GET uri=/play/animals route="static"}: finished processing request latency=0 ms status=200
//! ```

use axum::http::Request;
use std::sync::Arc;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span, info_span};

use crate::devserver::ProxyTable;

/// Opens the per-request span, looking the path up in the proxy table.
#[derive(Clone)]
pub struct RouteSpan {
    proxy: Arc<ProxyTable>,
}

impl<B> MakeSpan<B> for RouteSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let method = request.method();
        let uri = request.uri();
        match self.proxy.match_path(uri.path()) {
            Some(rule) => info_span!(
                "request",
                %method,
                %uri,
                route = "proxy",
                prefix = %rule.prefix,
                upstream = %rule.target,
            ),
            None => info_span!("request", %method, %uri, route = "static"),
        }
    }
}

pub type DevTraceLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RouteSpan, DefaultOnRequest, DefaultOnResponse>;

pub fn layer(proxy: Arc<ProxyTable>) -> DevTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RouteSpan { proxy })
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

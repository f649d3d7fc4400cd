//! Request forwarding for proxied path prefixes.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Version, header},
    middleware::Next,
    response::Response,
};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use serde_json::json;
use tracing::{debug, warn};

use super::proxy::{ProxyRule, has_dot_segment};
use crate::error::AppError;
use crate::state::DevState;

/// Client used for upstream requests. It sends the request target exactly
/// as given and never follows redirects.
pub type ProxyClient = Client<HttpConnector, Body>;

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Forwards requests matching a proxy rule; everything else continues to the
/// inner service (static files).
///
/// # Errors
///
/// - `400 Bad Request` if a matched path contains `.` or `..` segments
/// - `502 Bad Gateway` if the upstream cannot be reached
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .fallback_service(ServeDir::new("build"))
///     .layer(middleware::from_fn_with_state(state, forward::layer));
/// ```
pub async fn layer(
    State(state): State<DevState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    match state.proxy.match_path(req.uri().path()) {
        Some(rule) => forward(&state.http, rule, req).await,
        None => Ok(next.run(req).await),
    }
}

/// Sends `req` to the rule's target with its method, path, query, headers and
/// body unchanged, and relays the upstream response as it streams in.
///
/// The request target is copied byte for byte. Paths with `.` or `..`
/// segments are refused.
pub async fn forward(
    http: &ProxyClient,
    rule: &ProxyRule,
    req: Request,
) -> Result<Response, AppError> {
    if has_dot_segment(req.uri().path()) {
        return Err(AppError::bad_request(
            "Path with dot segments cannot be proxied",
            json!({"path": req.uri().path()}),
        ));
    }

    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let upstream = rule.upstream_uri(path_and_query).map_err(|e| {
        AppError::internal(
            "Invalid upstream URL",
            json!({"prefix": rule.prefix, "reason": e.to_string()}),
        )
    })?;

    let (mut parts, body) = req.into_parts();
    debug!("Proxying {} {} -> {}", parts.method, parts.uri, upstream);

    let mut headers = strip_hop_by_hop(&parts.headers);
    if rule.change_origin
        && let Some(authority) = rule.target_authority()
        && let Ok(value) = HeaderValue::from_str(&authority)
    {
        headers.insert(header::HOST, value);
    }
    parts.headers = headers;
    parts.uri = upstream.clone();
    parts.version = Version::HTTP_11;

    let upstream_response = http
        .request(Request::from_parts(parts, body))
        .await
        .map_err(|e| {
            warn!("Upstream request to {} failed: {}", upstream, e);
            AppError::bad_gateway(
                "Upstream request failed",
                json!({"upstream": upstream.to_string(), "reason": e.to_string()}),
            )
        })?;

    let status = upstream_response.status();
    let headers = strip_hop_by_hop(upstream_response.headers());

    let mut response = Response::new(Body::new(upstream_response.into_body()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

/// Copies `headers` without hop-by-hop headers, including any named in
/// `Connection`.
fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let listed: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .collect();

    headers
        .iter()
        .filter(|(name, _)| {
            let name = name.as_str();
            !HOP_BY_HOP.contains(&name) && !listed.iter().any(|l| l == name)
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

//! Prefix-based proxy rule table.

use axum::http::Uri;
use axum::http::uri::InvalidUri;
use url::Url;

use super::config::DevConfig;

/// Requests whose path starts with `prefix` go to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRule {
    pub prefix: String,
    pub target: Url,
    pub change_origin: bool,
}

impl ProxyRule {
    /// Plain string prefix test on the request path, like the frontend dev
    /// server does: `/_` matches `/_/`, `/_/login` and also `/_app.js`.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Upstream URI for a request: the target origin (and path, if any)
    /// followed by the request's path and query byte for byte.
    pub fn upstream_uri(&self, path_and_query: &str) -> Result<Uri, InvalidUri> {
        let base = self.target.as_str().trim_end_matches('/');
        format!("{base}{path_and_query}").parse()
    }

    /// `host[:port]` of the target, used when `change_origin` is set.
    pub fn target_authority(&self) -> Option<String> {
        let host = self.target.host_str()?;
        Some(match self.target.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }
}

/// True if any segment of `path` is `.` or `..`, plain or percent-encoded.
///
/// Such paths can match a prefix and still resolve outside of it upstream.
pub fn has_dot_segment(path: &str) -> bool {
    path.split('/').any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

/// Ordered set of proxy rules; the longest matching prefix wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyTable {
    rules: Vec<ProxyRule>,
}

impl ProxyTable {
    pub fn new(mut rules: Vec<ProxyRule>) -> Self {
        rules.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self { rules }
    }

    /// Table built from the `server.proxy` section.
    pub fn from_config(config: &DevConfig) -> Self {
        Self::new(
            config
                .server
                .proxy
                .iter()
                .map(|(prefix, target)| ProxyRule {
                    prefix: prefix.clone(),
                    target: target.target.clone(),
                    change_origin: target.change_origin,
                })
                .collect(),
        )
    }

    /// Table that forwards nothing, used for production builds.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn match_path(&self, path: &str) -> Option<&ProxyRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    pub fn rules(&self) -> &[ProxyRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

//! Shared state of the dev server.

use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use std::sync::Arc;
use std::time::Duration;

use crate::devserver::ProxyTable;
use crate::devserver::forward::ProxyClient;

#[derive(Clone)]
pub struct DevState {
    pub proxy: Arc<ProxyTable>,
    pub http: ProxyClient,
}

impl DevState {
    /// Builds the state with an upstream client suited to proxying: redirects
    /// are relayed to the browser instead of followed, and only connecting is
    /// bounded by `connect_timeout` so long-lived streams stay open.
    pub fn new(proxy: ProxyTable, connect_timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        connector.set_nodelay(true);

        Self {
            proxy: Arc::new(proxy),
            http: Client::builder(TokioExecutor::new()).build(connector),
        }
    }
}

//! `reqwest` implementation of [`RecordTransport`].

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::error::ClientError;
use super::transport::{ListQuery, ListResult, RecordTransport};

/// Error body the backend returns with non-success responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
}

/// Talks to the backend's REST API under `{base_url}/api/collections`.
///
/// The auth token, once set by [`RecordTransport::authenticate`], is sent
/// verbatim in the `Authorization` header of every later request. A poisoned
/// token lock is still read and written.
pub struct HttpTransport {
    base_url: Url,
    http: Client,
    token: RwLock<Option<String>>,
}

impl HttpTransport {
    /// Builds a transport with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: Url, http: Client) -> Self {
        Self {
            base_url,
            http,
            token: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `{base}/api/{segments...}`, percent-encoding each segment so
    /// ids and names cannot alter the path.
    fn api_url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    /// `{base}/api/collections/{collection}/{tail...}`.
    fn collection_url(&self, collection: &str, tail: &[&str]) -> Result<Url, ClientError> {
        let mut segments = vec!["collections", collection];
        segments.extend_from_slice(tail);
        self.api_url(&segments)
    }

    fn store_token(&self, token: String) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(token);
    }

    fn current_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.current_token() {
            Some(token) => builder.header(header::AUTHORIZATION, token),
            None => builder,
        }
    }

    /// Sends the request and decodes a JSON success body.
    ///
    /// `204 No Content` yields `Value::Null`.
    async fn send(&self, builder: RequestBuilder) -> Result<Value, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());

        if status.is_success() {
            if status == StatusCode::NO_CONTENT {
                return Ok(Value::Null);
            }
            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let body = response.bytes().await.unwrap_or_default();
        let parsed: ApiErrorBody = serde_json::from_slice(&body).unwrap_or(ApiErrorBody {
            message: String::from_utf8_lossy(&body).into_owned(),
            data: Value::Null,
        });

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(parsed.message));
        }

        Err(ClientError::Api {
            status: status.as_u16(),
            message: parsed.message,
            data: parsed.data,
        })
    }
}

#[async_trait]
impl RecordTransport for HttpTransport {
    async fn list(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<ListResult<Value>, ClientError> {
        let mut url = self.collection_url(collection, &["records"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("perPage", &query.per_page.to_string());
            if let Some(filter) = &query.filter {
                pairs.append_pair("filter", filter);
            }
            if let Some(sort) = &query.sort {
                pairs.append_pair("sort", sort);
            }
            if query.skip_total {
                pairs.append_pair("skipTotal", "1");
            }
        }

        let value = self.send(self.request(Method::GET, url)).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn view(&self, collection: &str, id: &str) -> Result<Value, ClientError> {
        let url = self.collection_url(collection, &["records", id])?;
        self.send(self.request(Method::GET, url)).await
    }

    async fn create(&self, collection: &str, body: Value) -> Result<Value, ClientError> {
        let url = self.collection_url(collection, &["records"])?;
        self.send(self.request(Method::POST, url).json(&body)).await
    }

    async fn update(&self, collection: &str, id: &str, body: Value) -> Result<Value, ClientError> {
        let url = self.collection_url(collection, &["records", id])?;
        self.send(self.request(Method::PATCH, url).json(&body)).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), ClientError> {
        let url = self.collection_url(collection, &["records", id])?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn authenticate(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let url = self.collection_url(collection, &["auth-with-password"])?;
        let body = json!({ "identity": identity, "password": password });
        let value = self
            .send(self.http.request(Method::POST, url).json(&body))
            .await?;
        let auth: AuthResponse = serde_json::from_value(value)?;

        self.store_token(auth.token);
        Ok(())
    }

    async fn import_collections(
        &self,
        collections: Value,
        delete_missing: bool,
    ) -> Result<(), ClientError> {
        let url = self.api_url(&["collections", "import"])?;
        let body = json!({ "collections": collections, "deleteMissing": delete_missing });
        self.send(self.request(Method::PUT, url).json(&body)).await?;
        Ok(())
    }
}

//! Untyped transport seam between typed record services and the backend.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::error::ClientError;

/// Query parameters of a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub skip_total: bool,
}

/// One page of records as returned by the list endpoint.
///
/// With `skip_total` the backend reports `-1` for both totals.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    pub page: u32,
    pub per_page: u32,
    pub total_items: i64,
    pub total_pages: i64,
    pub items: Vec<T>,
}

impl<T> ListResult<T> {
    /// Converts every item, keeping the paging metadata.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<ListResult<U>, E> {
        Ok(ListResult {
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
        })
    }
}

/// Raw record operations keyed by collection name.
///
/// Every record service, typed or not, goes through the same transport, so
/// the calls a typed handle makes are exactly the calls an untyped one makes.
///
/// # Implementations
///
/// - [`crate::infrastructure::pocketbase::HttpTransport`] - REST over `reqwest`
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordTransport: Send + Sync {
    /// `GET /api/collections/{collection}/records`
    async fn list(&self, collection: &str, query: &ListQuery)
    -> Result<ListResult<Value>, ClientError>;

    /// `GET /api/collections/{collection}/records/{id}`
    async fn view(&self, collection: &str, id: &str) -> Result<Value, ClientError>;

    /// `POST /api/collections/{collection}/records`
    async fn create(&self, collection: &str, body: Value) -> Result<Value, ClientError>;

    /// `PATCH /api/collections/{collection}/records/{id}`
    async fn update(&self, collection: &str, id: &str, body: Value)
    -> Result<Value, ClientError>;

    /// `DELETE /api/collections/{collection}/records/{id}`
    async fn delete(&self, collection: &str, id: &str) -> Result<(), ClientError>;

    /// Authenticates against an auth collection and keeps the token for
    /// subsequent requests.
    async fn authenticate(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> Result<(), ClientError>;

    /// `PUT /api/collections/import`
    ///
    /// Creates or replaces collection schemas from a `collections.json`
    /// export. Requires a superuser token.
    async fn import_collections(
        &self,
        collections: Value,
        delete_missing: bool,
    ) -> Result<(), ClientError>;
}

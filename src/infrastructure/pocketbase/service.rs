//! Record services: per-collection handles over a shared transport.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::error::ClientError;
use super::transport::{ListQuery, ListResult, RecordTransport};

/// Batch size used by [`RecordService::get_full_list`].
pub const DEFAULT_BATCH_SIZE: u32 = 500;

/// Optional filtering and ordering for list queries.
///
/// `filter` and `sort` use the backend's own expression syntax, e.g.
/// `name = "Animals"` and `-created,word`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub skip_total: bool,
}

impl ListOptions {
    pub fn filter(filter: impl Into<String>) -> Self {
        Self {
            filter: Some(filter.into()),
            ..Self::default()
        }
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    fn to_query(&self, page: u32, per_page: u32) -> ListQuery {
        ListQuery {
            page,
            per_page,
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            skip_total: self.skip_total,
        }
    }
}

/// Handle bound to one collection, reading and writing records as `R`.
///
/// `R` is [`crate::domain::entities::Category`] or
/// [`crate::domain::entities::Word`] for the known collections and
/// [`crate::domain::entities::Record`] for everything else. The type only
/// drives (de)serialization; the request sent is the same for every `R`.
pub struct RecordService<R> {
    collection: String,
    transport: Arc<dyn RecordTransport>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for RecordService<R> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            transport: Arc::clone(&self.transport),
            _record: PhantomData,
        }
    }
}

impl<R> fmt::Debug for RecordService<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordService")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl<R> RecordService<R> {
    pub(crate) fn new(collection: impl Into<String>, transport: Arc<dyn RecordTransport>) -> Self {
        Self {
            collection: collection.into(),
            transport,
            _record: PhantomData,
        }
    }

    /// Name of the collection this handle is bound to.
    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    /// Rebinds the same collection and transport with another record type.
    pub fn retype<U>(self) -> RecordService<U> {
        RecordService {
            collection: self.collection,
            transport: self.transport,
            _record: PhantomData,
        }
    }
}

impl<R: DeserializeOwned> RecordService<R> {
    /// Fetches one page of records.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] if an item does not match `R`, or the
    /// transport error unchanged.
    pub async fn get_list(
        &self,
        page: u32,
        per_page: u32,
        options: &ListOptions,
    ) -> Result<ListResult<R>, ClientError> {
        let raw = self
            .transport
            .list(&self.collection, &options.to_query(page, per_page))
            .await?;
        raw.try_map(serde_json::from_value)
            .map_err(ClientError::from)
    }

    /// Fetches every matching record, page by page, in batches of
    /// [`DEFAULT_BATCH_SIZE`]. Stops at the first short page.
    pub async fn get_full_list(&self, options: &ListOptions) -> Result<Vec<R>, ClientError> {
        let options = ListOptions {
            skip_total: true,
            ..options.clone()
        };

        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.get_list(page, DEFAULT_BATCH_SIZE, &options).await?;
            let fetched = batch.items.len();
            records.extend(batch.items);
            if fetched < DEFAULT_BATCH_SIZE as usize {
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    /// Returns the first record matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when nothing matches.
    pub async fn get_first_list_item(&self, filter: &str) -> Result<R, ClientError> {
        let options = ListOptions {
            filter: Some(filter.to_string()),
            sort: None,
            skip_total: true,
        };

        self.get_list(1, 1, &options)
            .await?
            .items
            .into_iter()
            .next()
            .ok_or_else(|| {
                ClientError::NotFound(format!("no {} record matches {filter}", self.collection))
            })
    }

    pub async fn get_one(&self, id: &str) -> Result<R, ClientError> {
        let raw = self.transport.view(&self.collection, id).await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Creates a record from any serializable body and returns it as stored.
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<R, ClientError> {
        let raw = self
            .transport
            .create(&self.collection, serde_json::to_value(body)?)
            .await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Patches a record; fields missing from `body` are left unchanged.
    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<R, ClientError> {
        let raw = self
            .transport
            .update(&self.collection, id, serde_json::to_value(body)?)
            .await?;
        Ok(serde_json::from_value(raw)?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.transport.delete(&self.collection, id).await
    }
}

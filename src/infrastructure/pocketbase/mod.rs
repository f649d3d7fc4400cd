//! Typed facade over the PocketBase record API.
//!
//! [`PocketBase::collection`] narrows a collection name to a typed handle:
//!
//! | name           | handle                                          |
//! |----------------|-------------------------------------------------|
//! | `"categories"` | [`CollectionHandle::Categories`] (`Category`)   |
//! | `"words"`      | [`CollectionHandle::Words`] (`Word`)            |
//! | anything else  | [`CollectionHandle::Other`] (untyped `Record`)  |
//!
//! Every branch builds the same [`RecordService`] over the same transport;
//! the narrowing only changes how JSON is decoded.
//!
//! # Process-wide instance
//!
//! Application code shares one client. Install it once at startup with
//! [`init`] and fetch it anywhere with [`instance`]:
//!
//! ```rust,ignore
//! let client = PocketBase::connect(&config.pocketbase_url, timeout)?;
//! pocketbase::init(client)?;
//!
//! let words = pocketbase::instance()?.records::<Word>();
//! ```

mod error;
mod filter;
mod http_transport;
mod service;
mod transport;

pub use error::ClientError;
pub use filter::filter_eq;
pub use http_transport::HttpTransport;
pub use service::{DEFAULT_BATCH_SIZE, ListOptions, RecordService};
#[cfg(test)]
pub use transport::MockRecordTransport;
pub use transport::{ListQuery, ListResult, RecordTransport};

use std::sync::{Arc, OnceLock};
use std::time::Duration;
use url::Url;

use crate::domain::collection::{Collection, CollectionRecord};
use crate::domain::entities::{Category, Record, Word};

/// Auth collection holding backend superusers.
pub const SUPERUSERS_COLLECTION: &str = "_superusers";

static INSTANCE: OnceLock<PocketBase> = OnceLock::new();

/// Installs the process-wide client.
///
/// # Errors
///
/// Returns [`ClientError::AlreadyInitialized`] if called more than once; the
/// first instance stays in place.
pub fn init(client: PocketBase) -> Result<&'static PocketBase, ClientError> {
    INSTANCE
        .set(client)
        .map_err(|_| ClientError::AlreadyInitialized)?;
    tracing::debug!("PocketBase client initialized");
    instance()
}

/// Returns the process-wide client. Every call yields the same instance.
///
/// # Errors
///
/// Returns [`ClientError::NotInitialized`] before [`init`] has run.
pub fn instance() -> Result<&'static PocketBase, ClientError> {
    INSTANCE.get().ok_or(ClientError::NotInitialized)
}

/// Result of looking a collection up by name.
#[derive(Debug, Clone)]
pub enum CollectionHandle {
    Categories(RecordService<Category>),
    Words(RecordService<Word>),
    Other(RecordService<Record>),
}

impl CollectionHandle {
    pub fn name(&self) -> &str {
        match self {
            CollectionHandle::Categories(s) => s.collection_name(),
            CollectionHandle::Words(s) => s.collection_name(),
            CollectionHandle::Other(s) => s.collection_name(),
        }
    }

    /// Drops the shape guarantee, keeping the collection binding.
    pub fn into_untyped(self) -> RecordService<Record> {
        match self {
            CollectionHandle::Categories(s) => s.retype(),
            CollectionHandle::Words(s) => s.retype(),
            CollectionHandle::Other(s) => s,
        }
    }
}

/// Client for a PocketBase-compatible backend.
#[derive(Clone)]
pub struct PocketBase {
    base_url: Url,
    transport: Arc<dyn RecordTransport>,
}

impl PocketBase {
    pub fn new(base_url: Url, transport: Arc<dyn RecordTransport>) -> Self {
        Self {
            base_url,
            transport,
        }
    }

    /// Builds a client talking HTTP to `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Url`] for an unparsable base URL and
    /// [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn connect(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)?;
        let transport = HttpTransport::new(base_url.clone(), timeout)?;
        Ok(Self::new(base_url, Arc::new(transport)))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Looks a collection up by name, narrowing known names to typed handles.
    pub fn collection(&self, name: &str) -> CollectionHandle {
        match Collection::from_name(name) {
            Some(Collection::Categories) => CollectionHandle::Categories(self.service(name)),
            Some(Collection::Words) => CollectionHandle::Words(self.service(name)),
            None => CollectionHandle::Other(self.service(name)),
        }
    }

    /// Typed handle for a known collection.
    pub fn records<R: CollectionRecord>(&self) -> RecordService<R> {
        self.service(R::COLLECTION.name())
    }

    /// Untyped handle for any collection, known or not.
    pub fn untyped(&self, name: &str) -> RecordService<Record> {
        self.service(name)
    }

    /// Authenticates against an auth collection (e.g. [`SUPERUSERS_COLLECTION`]).
    /// Later requests through any handle carry the token.
    pub async fn auth_with_password(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        self.transport
            .authenticate(collection, identity, password)
            .await
    }

    /// Creates or replaces collection schemas from the definitions of a
    /// `collections.json` export. With `delete_missing`, collections absent
    /// from `collections` are dropped together with their records.
    ///
    /// Requires a prior superuser [`auth_with_password`](Self::auth_with_password).
    pub async fn import_collections(
        &self,
        collections: Vec<serde_json::Value>,
        delete_missing: bool,
    ) -> Result<(), ClientError> {
        self.transport
            .import_collections(serde_json::Value::Array(collections), delete_missing)
            .await
    }

    fn service<R>(&self, name: &str) -> RecordService<R> {
        RecordService::new(name, Arc::clone(&self.transport))
    }
}

impl std::fmt::Debug for PocketBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PocketBase")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(items: Vec<serde_json::Value>) -> ListResult<serde_json::Value> {
        ListResult {
            page: 1,
            per_page: 30,
            total_items: items.len() as i64,
            total_pages: 1,
            items,
        }
    }

    fn client(mock: MockRecordTransport) -> PocketBase {
        PocketBase::new(Url::parse("http://127.0.0.1:5173/").unwrap(), Arc::new(mock))
    }

    #[test]
    fn test_collection_narrows_known_names() {
        let pb = client(MockRecordTransport::new());

        assert!(matches!(
            pb.collection("categories"),
            CollectionHandle::Categories(_)
        ));
        assert!(matches!(pb.collection("words"), CollectionHandle::Words(_)));
        assert!(matches!(pb.collection("sessions"), CollectionHandle::Other(_)));
    }

    #[test]
    fn test_collection_binds_literal_name() {
        let pb = client(MockRecordTransport::new());

        assert_eq!(pb.collection("categories").name(), "categories");
        assert_eq!(pb.collection("words").name(), "words");
        assert_eq!(pb.collection("sessions").name(), "sessions");
        assert_eq!(pb.records::<Category>().collection_name(), "categories");
        assert_eq!(pb.records::<Word>().collection_name(), "words");
    }

    /// Lists page 1 through the narrowed handle and returns the items
    /// re-serialized.
    async fn typed_first_page(handle: CollectionHandle) -> Vec<serde_json::Value> {
        let options = ListOptions::default();
        let items: Result<Vec<serde_json::Value>, serde_json::Error> = match handle {
            CollectionHandle::Categories(service) => {
                let page = service.get_list(1, 30, &options).await.unwrap();
                page.items.iter().map(serde_json::to_value).collect()
            }
            CollectionHandle::Words(service) => {
                let page = service.get_list(1, 30, &options).await.unwrap();
                page.items.iter().map(serde_json::to_value).collect()
            }
            CollectionHandle::Other(service) => {
                let page = service.get_list(1, 30, &options).await.unwrap();
                page.items.iter().map(serde_json::to_value).collect()
            }
        };
        items.unwrap()
    }

    #[tokio::test]
    async fn test_typed_and_untyped_lookups_issue_identical_calls() {
        let cases = [
            (
                "categories",
                json!({"id": "c1", "name": "Animals", "mustHint": false, "mustPresent": true}),
            ),
            (
                "words",
                json!({"id": "w1", "word": "cat", "category": "c1", "hint": "pet", "hintLong": "Says meow"}),
            ),
        ];

        for (name, stored) in cases {
            let mut mock = MockRecordTransport::new();
            let expected = stored.clone();
            mock.expect_list()
                .withf(move |collection, query| {
                    collection == name
                        && query
                            == &ListQuery {
                                page: 1,
                                per_page: 30,
                                filter: None,
                                sort: None,
                                skip_total: false,
                            }
                })
                .times(2)
                .returning(move |_, _| Ok(page(vec![expected.clone()])));

            let pb = client(mock);

            let handle = pb.collection(name);
            assert!(!matches!(handle, CollectionHandle::Other(_)), "{name}");
            let typed = typed_first_page(handle).await;
            let untyped = pb
                .untyped(name)
                .get_list(1, 30, &ListOptions::default())
                .await
                .unwrap();

            assert_eq!(typed, vec![stored.clone()], "{name}");
            assert_eq!(serde_json::to_value(&untyped.items[0]).unwrap(), stored);
        }
    }

    #[tokio::test]
    async fn test_import_collections_sends_array() {
        let mut mock = MockRecordTransport::new();
        mock.expect_import_collections()
            .withf(|collections, delete_missing| {
                collections == &json!([{"name": "categories"}, {"name": "words"}])
                    && !*delete_missing
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let pb = client(mock);

        pb.import_collections(
            vec![json!({"name": "categories"}), json!({"name": "words"})],
            false,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_category_handle_decodes_typed_fields() {
        let stored = json!({"id": "c1", "name": "Animals", "mustHint": false, "mustPresent": true});
        let mut mock = MockRecordTransport::new();
        mock.expect_list()
            .returning(move |_, _| Ok(page(vec![stored.clone()])));
        let pb = client(mock);

        let CollectionHandle::Categories(typed) = pb.collection("categories") else {
            panic!("categories must narrow to a Category handle");
        };
        let typed = typed.get_list(1, 30, &ListOptions::default()).await.unwrap();

        assert_eq!(
            typed.items[0],
            Category {
                id: "c1".to_string(),
                name: "Animals".to_string(),
                must_hint: false,
                must_present: true,
            }
        );
    }

    #[tokio::test]
    async fn test_words_lookup_reads_word_without_hints() {
        let mut mock = MockRecordTransport::new();
        mock.expect_view()
            .withf(|collection, id| collection == "words" && id == "w1")
            .times(1)
            .returning(|_, _| Ok(json!({"id": "w1", "word": "cat", "category": "c1"})));

        let pb = client(mock);
        let CollectionHandle::Words(words) = pb.collection("words") else {
            panic!("words must narrow to a Word handle");
        };

        let word = words.get_one("w1").await.unwrap();
        assert_eq!(word.word, "cat");
        assert_eq!(word.category, "c1");
        assert!(word.hint.is_none());
        assert!(word.hint_long.is_none());
    }

    #[tokio::test]
    async fn test_unknown_collection_is_untyped() {
        let mut mock = MockRecordTransport::new();
        mock.expect_view()
            .withf(|collection, id| collection == "sessions" && id == "s1")
            .times(1)
            .returning(|_, _| Ok(json!({"id": "s1", "score": 7})));

        let pb = client(mock);
        let handle = pb.collection("sessions");
        assert!(matches!(handle, CollectionHandle::Other(_)));

        let record = handle.into_untyped().get_one("s1").await.unwrap();
        assert_eq!(record.id, "s1");
        assert_eq!(record.get("score"), Some(&json!(7)));
    }

    #[tokio::test]
    async fn test_into_untyped_keeps_binding() {
        let mut mock = MockRecordTransport::new();
        mock.expect_delete()
            .withf(|collection, id| collection == "words" && id == "w9")
            .times(1)
            .returning(|_, _| Ok(()));

        let pb = client(mock);
        let untyped = pb.collection("words").into_untyped();

        assert_eq!(untyped.collection_name(), "words");
        untyped.delete("w9").await.unwrap();
    }

    #[tokio::test]
    async fn test_auth_with_password_delegates() {
        let mut mock = MockRecordTransport::new();
        mock.expect_authenticate()
            .withf(|collection, identity, password| {
                collection == SUPERUSERS_COLLECTION
                    && identity == "admin@example.com"
                    && password == "secret"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let pb = client(mock);
        pb.auth_with_password(SUPERUSERS_COLLECTION, "admin@example.com", "secret")
            .await
            .unwrap();
    }
}

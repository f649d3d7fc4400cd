#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "secret-password";
pub const ADMIN_TOKEN: &str = "test-superuser-token";

/// One request as the fake backend saw it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub uri: String,
    pub authorization: Option<String>,
}

/// In-memory stand-in for the record store's REST API.
#[derive(Clone, Default)]
pub struct FakeBackend {
    records: Arc<Mutex<BTreeMap<String, Vec<Map<String, Value>>>>>,
    seen: Arc<Mutex<Vec<Seen>>>,
    next_id: Arc<Mutex<u64>>,
    schema_imports: Arc<Mutex<Vec<Value>>>,
}

impl FakeBackend {
    pub fn insert(&self, collection: &str, record: Value) {
        let Value::Object(record) = record else {
            panic!("records must be JSON objects");
        };
        self.records
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(record);
    }

    pub fn records(&self, collection: &str) -> Vec<Value> {
        self.records
            .lock()
            .unwrap()
            .get(collection)
            .map(|items| items.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    /// Bodies of accepted collection schema imports.
    pub fn schema_imports(&self) -> Vec<Value> {
        self.schema_imports.lock().unwrap().clone()
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn record_request(&self, method: &Method, uri: &Uri, headers: &HeaderMap) {
        self.seen.lock().unwrap().push(Seen {
            method: method.clone(),
            uri: uri.to_string(),
            authorization: headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });
    }

    fn new_id(&self) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("rec{:012}", *next)
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(
                "/api/collections/{collection}/records",
                get(list_records).post(create_record),
            )
            .route(
                "/api/collections/{collection}/records/{id}",
                get(view_record).patch(update_record).delete(delete_record),
            )
            .route(
                "/api/collections/{collection}/auth-with-password",
                post(auth_with_password),
            )
            .route("/api/collections/import", put(import_collections))
            .with_state(self.clone())
    }
}

/// Serves `router` on an ephemeral local port.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Starts a fake record store and returns it with its base URL.
pub async fn spawn_backend() -> (FakeBackend, String) {
    let backend = FakeBackend::default();
    let addr = spawn(backend.router()).await;
    (backend, format!("http://{addr}/"))
}

/// Upstream that answers every request with a JSON description of it.
pub fn echo_router() -> Router {
    Router::new().fallback(echo)
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    Json(json!({
        "method": method.as_str(),
        "uri": uri.to_string(),
        "host": headers.get(header::HOST).and_then(|v| v.to_str().ok()),
        "authorization": headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
        "body": String::from_utf8_lossy(&body),
    }))
}

fn api_error(status: StatusCode, message: &str, data: Value) -> Response {
    (
        status,
        Json(json!({"code": status.as_u16(), "message": message, "data": data})),
    )
        .into_response()
}

fn not_found() -> Response {
    api_error(
        StatusCode::NOT_FOUND,
        "The requested resource wasn't found.",
        json!({}),
    )
}

fn has_id(record: &Map<String, Value>, id: &str) -> bool {
    record.get("id").and_then(Value::as_str) == Some(id)
}

/// Supports only `field = "value"` filters, which is all the client emits.
fn matches_filter(record: &Map<String, Value>, filter: Option<&String>) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    let Some((field, value)) = filter.split_once(" = ") else {
        return true;
    };
    let value = value.trim_matches('"').replace("\\\"", "\"").replace("\\\\", "\\");
    record.get(field.trim()).and_then(Value::as_str) == Some(value.as_str())
}

async fn list_records(
    State(backend): State<FakeBackend>,
    Path(collection): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    backend.record_request(&method, &uri, &headers);

    let params: HashMap<String, String> =
        url::form_urlencoded::parse(uri.query().unwrap_or("").as_bytes())
            .into_owned()
            .collect();

    let page: usize = params.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let per_page: usize = params
        .get("perPage")
        .and_then(|v| v.parse().ok())
        .unwrap_or(30);
    let skip_total = params
        .get("skipTotal")
        .is_some_and(|v| v == "1" || v == "true");

    let matching: Vec<Value> = backend
        .records
        .lock()
        .unwrap()
        .get(&collection)
        .map(|items| {
            items
                .iter()
                .filter(|r| matches_filter(r, params.get("filter")))
                .cloned()
                .map(Value::Object)
                .collect()
        })
        .unwrap_or_default();

    let total = matching.len();
    let items: Vec<Value> = matching
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();
    let (total_items, total_pages) = if skip_total {
        (-1, -1)
    } else {
        (total as i64, total.div_ceil(per_page.max(1)) as i64)
    };

    Json(json!({
        "page": page,
        "perPage": per_page,
        "totalItems": total_items,
        "totalPages": total_pages,
        "items": items,
    }))
    .into_response()
}

async fn view_record(
    State(backend): State<FakeBackend>,
    Path((collection, id)): Path<(String, String)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    backend.record_request(&method, &uri, &headers);

    let found = backend
        .records
        .lock()
        .unwrap()
        .get(&collection)
        .and_then(|items| items.iter().find(|r| has_id(r, &id)).cloned());

    match found {
        Some(record) => Json(Value::Object(record)).into_response(),
        None => not_found(),
    }
}

async fn create_record(
    State(backend): State<FakeBackend>,
    Path(collection): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.record_request(&method, &uri, &headers);

    let Value::Object(mut record) = body else {
        return api_error(StatusCode::BAD_REQUEST, "Invalid body.", json!({}));
    };
    if collection == "words" && record.get("word").and_then(Value::as_str).unwrap_or("").is_empty()
    {
        return api_error(
            StatusCode::BAD_REQUEST,
            "Failed to create record.",
            json!({"word": {"code": "validation_required", "message": "Cannot be blank."}}),
        );
    }

    record.insert("id".to_string(), json!(backend.new_id()));
    record.insert("collectionName".to_string(), json!(collection));
    record.insert("created".to_string(), json!("2024-01-01 00:00:00.000Z"));
    backend
        .records
        .lock()
        .unwrap()
        .entry(collection)
        .or_default()
        .push(record.clone());

    Json(Value::Object(record)).into_response()
}

async fn update_record(
    State(backend): State<FakeBackend>,
    Path((collection, id)): Path<(String, String)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    backend.record_request(&method, &uri, &headers);

    let mut records = backend.records.lock().unwrap();
    let Some(record) = records
        .get_mut(&collection)
        .and_then(|items| items.iter_mut().find(|r| has_id(r, &id)))
    else {
        return not_found();
    };
    for (key, value) in body {
        record.insert(key, value);
    }

    Json(Value::Object(record.clone())).into_response()
}

async fn delete_record(
    State(backend): State<FakeBackend>,
    Path((collection, id)): Path<(String, String)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    backend.record_request(&method, &uri, &headers);

    let mut records = backend.records.lock().unwrap();
    let Some(items) = records.get_mut(&collection) else {
        return not_found();
    };
    let before = items.len();
    items.retain(|r| !has_id(r, &id));
    if items.len() == before {
        return not_found();
    }

    StatusCode::NO_CONTENT.into_response()
}

async fn auth_with_password(
    State(backend): State<FakeBackend>,
    Path(collection): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.record_request(&method, &uri, &headers);

    if collection == "_superusers"
        && body["identity"] == ADMIN_EMAIL
        && body["password"] == ADMIN_PASSWORD
    {
        Json(json!({
            "token": ADMIN_TOKEN,
            "record": {"id": "su1", "email": ADMIN_EMAIL},
        }))
        .into_response()
    } else {
        api_error(
            StatusCode::BAD_REQUEST,
            "Failed to authenticate.",
            json!({}),
        )
    }
}

async fn import_collections(
    State(backend): State<FakeBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.record_request(&method, &uri, &headers);

    let authorized = headers
        .get(header::AUTHORIZATION)
        .is_some_and(|v| v.as_bytes() == ADMIN_TOKEN.as_bytes());
    if !authorized {
        return api_error(
            StatusCode::UNAUTHORIZED,
            "The request requires valid record authorization token.",
            json!({}),
        );
    }
    if !body["collections"].is_array() || !body["deleteMissing"].is_boolean() {
        return api_error(
            StatusCode::BAD_REQUEST,
            "Failed to import collections.",
            json!({}),
        );
    }

    backend.schema_imports.lock().unwrap().push(body);
    StatusCode::NO_CONTENT.into_response()
}

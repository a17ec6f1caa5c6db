#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::{delete, get},
    Router,
};
use flowgraph_bff::{build_app, AppConfig, InMemoryUserDirectory};
use parking_lot::Mutex;
use reqwest::Client;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

pub const OWNER: &str = "owner@acme.test";
pub const RIVAL: &str = "rival@other.test";
pub const NO_NUMBER: &str = "nonumber@acme.test";
pub const NO_COMPANY: &str = "orphan@acme.test";

/// One request received by the mock upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

/// In-memory stand-in for the upstream service.
#[derive(Debug, Default)]
pub struct MockUpstream {
    records: Mutex<HashMap<String, Vec<Value>>>,
    calls: Mutex<Vec<RecordedCall>>,
    next_id: AtomicI64,
}

impl MockUpstream {
    pub fn new() -> Arc<Self> {
        let mock = Self {
            next_id: AtomicI64::new(1000),
            ..Self::default()
        };
        Arc::new(mock)
    }

    pub fn insert(&self, resource: &str, record: Value) {
        self.records
            .lock()
            .entry(resource.to_string())
            .or_default()
            .push(record);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, method: &str, path_prefix: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method && call.path.starts_with(path_prefix))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, method: &Method, uri: &Uri, query: &HashMap<String, String>, body: Option<Value>) {
        self.calls.lock().push(RecordedCall {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: query.clone(),
            body,
        });
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        _ => None,
    }
}

fn has_id(record: &Value, id: &str) -> bool {
    record.get("id").and_then(as_text).as_deref() == Some(id)
}

/// Edges and conditions answer with `{"items": [...]}`, everything else with a bare array.
fn listing(resource: &str, items: Vec<Value>) -> Value {
    match resource {
        "edges" | "conditions" => {
            let total = items.len();
            json!({ "items": items, "total": total })
        }
        _ => Value::Array(items),
    }
}

async fn list_records(
    State(mock): State<Arc<MockUpstream>>,
    method: Method,
    uri: Uri,
    Path(resource): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    mock.record(&method, &uri, &query, None);
    let records = mock.records.lock();
    let items: Vec<Value> = records
        .get(&resource)
        .map(|items| {
            items
                .iter()
                .filter(|item| {
                    query
                        .iter()
                        .all(|(key, value)| item.get(key).and_then(as_text).as_deref() == Some(value.as_str()))
                })
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Json(listing(&resource, items)).into_response()
}

async fn create_record(
    State(mock): State<Arc<MockUpstream>>,
    method: Method,
    uri: Uri,
    Path(resource): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    mock.record(&method, &uri, &HashMap::new(), Some(body.clone()));
    if body.get("prompt") == Some(&json!("__reject__")) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "prompt rejected"})),
        )
            .into_response();
    }

    let mut record = body;
    let id = mock.next_id.fetch_add(1, Ordering::SeqCst);
    record["id"] = json!(id);
    mock.insert(&resource, record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn get_record(
    State(mock): State<Arc<MockUpstream>>,
    method: Method,
    uri: Uri,
    Path((resource, id)): Path<(String, String)>,
) -> Response {
    mock.record(&method, &uri, &HashMap::new(), None);
    let records = mock.records.lock();
    match records
        .get(&resource)
        .and_then(|items| items.iter().find(|item| has_id(item, &id)))
    {
        Some(record) => Json(record.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "not found"}))).into_response(),
    }
}

async fn update_record(
    State(mock): State<Arc<MockUpstream>>,
    method: Method,
    uri: Uri,
    Path((resource, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    mock.record(&method, &uri, &HashMap::new(), Some(body.clone()));
    let mut records = mock.records.lock();
    let Some(record) = records
        .get_mut(&resource)
        .and_then(|items| items.iter_mut().find(|item| has_id(item, &id)))
    else {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "not found"}))).into_response();
    };
    if let (Some(target), Value::Object(fields)) = (record.as_object_mut(), body) {
        for (key, value) in fields {
            target.insert(key, value);
        }
    }
    Json(record.clone()).into_response()
}

async fn delete_record(
    State(mock): State<Arc<MockUpstream>>,
    method: Method,
    uri: Uri,
    Path((resource, id)): Path<(String, String)>,
) -> Response {
    mock.record(&method, &uri, &HashMap::new(), None);
    if let Some(items) = mock.records.lock().get_mut(&resource) {
        items.retain(|item| !has_id(item, &id));
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_node_property(
    State(mock): State<Arc<MockUpstream>>,
    method: Method,
    uri: Uri,
    Path((node_id, property_id)): Path<(String, String)>,
) -> Response {
    mock.record(&method, &uri, &HashMap::new(), None);
    if let Some(items) = mock.records.lock().get_mut("node-properties") {
        items.retain(|item| {
            item.get("node_id").and_then(as_text).as_deref() != Some(node_id.as_str())
                || item.get("property_id").and_then(as_text).as_deref() != Some(property_id.as_str())
        });
    }
    StatusCode::NO_CONTENT.into_response()
}

pub async fn spawn_mock_upstream(mock: Arc<MockUpstream>) -> SocketAddr {
    let app = Router::new()
        .route("/api/:resource/", get(list_records).post(create_record))
        .route(
            "/api/:resource/:id/",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route(
            "/api/node-properties/:node_id/:property_id/",
            delete(delete_node_property),
        )
        .with_state(mock);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("local_addr should succeed");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

pub async fn spawn_app(base_url: Option<String>, directory: InMemoryUserDirectory) -> SocketAddr {
    let mut config = AppConfig::default();
    config.upstream.base_url = base_url;
    config.dashboard.max_concurrency = 2;

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("local_addr should succeed");
    let app = build_app(config, directory);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

pub fn directory() -> InMemoryUserDirectory {
    let directory = InMemoryUserDirectory::new();
    directory.insert(OWNER, "+100");
    directory.insert(RIVAL, "+200");
    directory.insert(NO_COMPANY, "+300");
    directory
}

/// Company 42 owns nodes 1 and 2, company 99 owns node 7.
pub fn seed(mock: &MockUpstream) {
    mock.insert("companies", json!({"id": "42", "unique_identifier": "+100"}));
    mock.insert("companies", json!({"company_id": 99, "unique_identifier": "+200"}));

    mock.insert("nodes", json!({"id": 1, "company_id": 42, "prompt": "Welcome"}));
    mock.insert("nodes", json!({"id": 2, "company_id": 42, "prompt": "Menu"}));
    mock.insert("nodes", json!({"id": 7, "company_id": 99, "prompt": "Rival"}));

    mock.insert(
        "edges",
        json!({"id": 10, "source_node_id": 1, "destination_node_id": 2, "label": "next", "priority": 0}),
    );
    mock.insert(
        "edges",
        json!({"id": 11, "source_node_id": 2, "destination_node_id": 1, "label": "back", "priority": 1}),
    );
    mock.insert(
        "edges",
        json!({"id": 70, "source_node_id": 7, "destination_node_id": null, "label": "rival", "priority": 0}),
    );

    mock.insert(
        "conditions",
        json!({"id": 100, "edge_id": 10, "operator": "eq", "compare_value": "yes"}),
    );
    mock.insert(
        "conditions",
        json!({"id": 700, "edge_id": 70, "operator": "eq", "compare_value": "no"}),
    );

    mock.insert(
        "properties",
        json!({"id": 20, "company_id": 42, "name": "color", "type": "string", "description": null}),
    );
    mock.insert(
        "properties",
        json!({"id": 21, "company_id": 99, "name": "size", "type": "number", "description": null}),
    );

    mock.insert("node-properties", json!({"id": 400, "node_id": 1, "property_id": 20}));
    mock.insert(
        "condition-properties",
        json!({"id": 300, "condition_id": 100, "property_id": 20}),
    );
}

// Test client wrapper for making API calls
pub struct TestClient {
    client: Client,
    base_url: String,
    user: Option<String>,
}

impl TestClient {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("http://{}", addr),
            user: None,
        }
    }

    pub fn as_user(mut self, email: &str) -> Self {
        self.user = Some(email.to_string());
        self
    }

    pub async fn send(&self, method: reqwest::Method, path: &str, body: Option<Value>) -> (u16, Value) {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(user) = &self.user {
            request = request.header("x-user-email", user);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.expect("request should reach the app");
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        self.send(reqwest::Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, json: Value) -> (u16, Value) {
        self.send(reqwest::Method::POST, path, Some(json)).await
    }

    pub async fn put(&self, path: &str, json: Value) -> (u16, Value) {
        self.send(reqwest::Method::PUT, path, Some(json)).await
    }

    pub async fn delete(&self, path: &str) -> (u16, Value) {
        self.send(reqwest::Method::DELETE, path, None).await
    }
}

/// Seeded mock upstream plus the app pointed at it.
pub struct Harness {
    pub mock: Arc<MockUpstream>,
    pub app: SocketAddr,
}

impl Harness {
    pub async fn start() -> Self {
        let mock = MockUpstream::new();
        seed(&mock);
        let upstream = spawn_mock_upstream(Arc::clone(&mock)).await;
        let app = spawn_app(Some(format!("http://{}/api/nodes", upstream)), directory()).await;
        Self { mock, app }
    }

    pub fn anonymous(&self) -> TestClient {
        TestClient::new(self.app)
    }

    pub fn client(&self, email: &str) -> TestClient {
        TestClient::new(self.app).as_user(email)
    }
}

/// Every response is exactly one of `{"data": ...}` or `{"error": {"code": string, ...}}`.
pub fn assert_envelope(body: &Value) {
    let object = body.as_object().expect("envelope must be an object");
    assert_eq!(object.len(), 1, "envelope must have exactly one key: {}", body);
    match (object.get("data"), object.get("error")) {
        (Some(_), None) => {}
        (None, Some(error)) => assert!(
            error.get("code").map(Value::is_string).unwrap_or(false),
            "error envelope needs a string code: {}",
            body
        ),
        _ => panic!("not an envelope: {}", body),
    }
}

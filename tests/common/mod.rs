//! 进程内的记录后端桩服务

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use student_register::config::ApiConfig;
use student_register::RecordService;
use tokio::net::TcpListener;

#[derive(Debug, Default)]
struct Inner {
    records: Vec<Value>,
    posted: Vec<Value>,
    content_types: Vec<String>,
    list_calls: usize,
    list_status: Option<StatusCode>,
    create_status: Option<StatusCode>,
}

#[derive(Clone, Default)]
pub struct StubBackend {
    inner: Arc<Mutex<Inner>>,
}

impl StubBackend {
    pub fn with_records(records: Vec<Value>) -> Self {
        let stub = Self::default();
        stub.inner.lock().unwrap().records = records;
        stub
    }

    pub fn fail_list(&self, status: StatusCode) {
        self.inner.lock().unwrap().list_status = Some(status);
    }

    pub fn fail_create(&self, status: StatusCode) {
        self.inner.lock().unwrap().create_status = Some(status);
    }

    /// 收到的 POST 请求体，按到达顺序
    pub fn posted(&self) -> Vec<Value> {
        self.inner.lock().unwrap().posted.clone()
    }

    pub fn content_types(&self) -> Vec<String> {
        self.inner.lock().unwrap().content_types.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.inner.lock().unwrap().list_calls
    }

    /// 在本地随机端口上提供 `/users`
    pub async fn spawn(&self) -> SocketAddr {
        let app = Router::new()
            .route("/users", get(list_users).post(create_user))
            .with_state(self.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }
}

pub fn service_for(addr: SocketAddr) -> RecordService {
    let api = ApiConfig {
        base_url: format!("http://{addr}"),
        resource: "users".to_string(),
    };
    RecordService::from_config(&api).unwrap()
}

async fn list_users(State(stub): State<StubBackend>) -> Response {
    let mut inner = stub.inner.lock().unwrap();
    inner.list_calls += 1;
    if let Some(status) = inner.list_status {
        return (status, Json(json!({ "error": "list failed" }))).into_response();
    }
    Json(Value::Array(inner.records.clone())).into_response()
}

async fn create_user(
    State(stub): State<StubBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut inner = stub.inner.lock().unwrap();
    inner.posted.push(body.clone());
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        inner
            .content_types
            .push(content_type.to_str().unwrap_or_default().to_string());
    }
    if let Some(status) = inner.create_status {
        return (status, Json(json!({ "error": "create failed" }))).into_response();
    }

    let mut record = body;
    record["id"] = json!((inner.records.len() + 1).to_string());
    inner.records.push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

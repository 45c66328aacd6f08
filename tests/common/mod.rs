//! In-memory `CustomerStore` and request helpers shared by the router tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use customer_service::store::{require_id, write_rejected};
use customer_service::{app, AppError, AppState, Customer, CustomerFilter, CustomerStore};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use tower::ServiceExt;

#[derive(Default)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, Customer>,
}

/// Keeps rows in a map. Writes can be switched to fail to exercise the write error path.
#[derive(Default)]
pub struct MemoryCustomerStore {
    table: Mutex<Table>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryCustomerStore {
    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.table.lock().unwrap().rows.len()
    }

    fn check_write(&self, action: &str, customer: &Customer) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(write_rejected(action, customer, "connection reset by peer"));
        }
        Ok(())
    }

    fn check_read(&self) -> Result<(), AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn create(&self, customer: &mut Customer) -> Result<(), AppError> {
        customer.id = None;
        self.check_write("creating", customer)?;
        let mut table = self.table.lock().unwrap();
        table.next_id += 1;
        let id = table.next_id;
        let now = Utc::now().naive_utc();
        customer.id = Some(id);
        customer.created_at = Some(now);
        customer.last_updated = Some(now);
        table.rows.insert(id, customer.clone());
        Ok(())
    }

    async fn update(&self, customer: &mut Customer) -> Result<(), AppError> {
        let id = require_id(customer)?;
        self.check_write("updating", customer)?;
        let mut table = self.table.lock().unwrap();
        if !table.rows.contains_key(&id) {
            return Err(write_rejected("updating", customer, format!("no customer with id {}", id)));
        }
        customer.last_updated = Some(Utc::now().naive_utc());
        table.rows.insert(id, customer.clone());
        Ok(())
    }

    async fn delete(&self, customer: &Customer) -> Result<(), AppError> {
        self.check_write("deleting", customer)?;
        if let Some(id) = customer.id {
            self.table.lock().unwrap().rows.remove(&id);
        }
        Ok(())
    }

    async fn find(&self, id: i32) -> Result<Option<Customer>, AppError> {
        self.check_read()?;
        Ok(self.table.lock().unwrap().rows.get(&id).cloned())
    }

    async fn find_by(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, AppError> {
        self.check_read()?;
        let table = self.table.lock().unwrap();
        Ok(table.rows.values().filter(|c| filter.matches(c)).cloned().collect())
    }

    async fn all(&self) -> Result<Vec<Customer>, AppError> {
        self.check_read()?;
        Ok(self.table.lock().unwrap().rows.values().cloned().collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_read()
    }
}

pub struct TestApp {
    pub store: Arc<MemoryCustomerStore>,
    pub router: Router,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryCustomerStore::default());
    let state = AppState::new(store.clone());
    TestApp {
        store,
        router: app(state, 64 * 1024),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let resp = self.router.clone().oneshot(req).await.expect("router is infallible");
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec();
        TestResponse { status, headers, body }
    }

    pub async fn call(&self, method: Method, uri: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, "localhost:8080")
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    pub async fn call_json(&self, method: Method, uri: &str, body: &Value) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, "localhost:8080")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    /// POSTs `payload` and returns the created body.
    pub async fn create(&self, payload: &Value) -> Value {
        let resp = self.call_json(Method::POST, "/customers", payload).await;
        assert_eq!(resp.status, StatusCode::CREATED, "could not create test customer");
        resp.json()
    }
}

pub fn customer_payload(n: usize) -> Value {
    let names = ["Ann", "Ben", "Cara", "Dev", "Eli"];
    json!({
        "name": names[n % names.len()],
        "address": format!("{} Main St, Springfield", 10 + n),
        "email": format!("user{}@example.com", n),
        "phone_number": format!("555-01{:02}", n),
        "member_since": format!("20{:02}-0{}-1{}", 10 + n, 1 + n % 9, n % 10),
    })
}

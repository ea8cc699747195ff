#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use person_service::config::{PersonConfig, StoreBackend};
use person_service::services::{init_metrics, InMemoryPersonStore, MongoDb, PersonStore};
use person_service::startup::{build_router, AppState, Application};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

/// Router over a fresh in-memory store.
pub fn memory_router() -> Router {
    router_with(Arc::new(InMemoryPersonStore::new()))
}

pub fn router_with(store: Arc<dyn PersonStore>) -> Router {
    init_metrics();
    build_router(AppState::new(store))
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Sends one request and decodes the JSON reply.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

/// Inserts people through the API and returns the `insertedPeople` array.
pub async fn add_people(app: &Router, people: Value) -> Vec<Value> {
    let (status, body) = send(app, json_request("POST", "/addPerson", &people)).await;
    assert_eq!(status, StatusCode::OK, "unexpected add response: {}", body);
    body["insertedPeople"].as_array().unwrap().clone()
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MongoDb,
    pub db_name: String,
}

impl TestApp {
    /// Spawns the full server against a uniquely named MongoDB database.
    pub async fn spawn() -> Self {
        std::env::set_var("MONGODB_URI", "mongodb://localhost:27017");

        let db_name = format!("person_test_{}", Uuid::new_v4());

        let mut config = PersonConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.mongodb.database = db_name.clone();
        config.store = StoreBackend::Mongo;

        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .expect("Failed to connect to MongoDB");

        init_metrics();
        let app = Application::build_with_store(config, Arc::new(db.clone()))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
        }
    }

    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}

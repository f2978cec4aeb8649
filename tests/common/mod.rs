#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use player_data_api::config::AppConfig;
use player_data_api::database::models::{PlayerRecord, PlayerRow, PlayerUpdate};
use player_data_api::database::{DatabaseError, PlayerStore};
use player_data_api::{app, AppState};

pub const API_KEY: &str = "test-secret-key";

/// In-memory stand-in for the `playerdata` table.
///
/// Documents are kept as JSON text, like the real columns, so reads go through
/// the same decoding path as production rows.
#[derive(Default)]
pub struct FakeStore {
    rows: Mutex<HashMap<String, PlayerRow>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert_raw(&self, user_id: &str, row: PlayerRow) {
        self.rows.lock().unwrap().insert(user_id.to_string(), row);
    }

    pub fn insert(&self, user_id: &str, points: i64, inventory: Value, challenges: Value) {
        self.insert_raw(
            user_id,
            PlayerRow {
                points: Some(points),
                challenges: Some(challenges.to_string()),
                inventory: Some(inventory.to_string()),
            },
        );
    }

    pub fn raw(&self, user_id: &str) -> Option<PlayerRow> {
        self.rows.lock().unwrap().get(user_id).cloned()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Number of backend operations attempted
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_with_errors(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn begin(&self) -> Result<(), DatabaseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DatabaseError::QueryError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PlayerStore for FakeStore {
    async fn find_player(&self, user_id: &str) -> Result<Option<PlayerRecord>, DatabaseError> {
        self.begin()?;
        self.raw(user_id).map(PlayerRecord::try_from).transpose()
    }

    async fn update_player(&self, user_id: &str, update: &PlayerUpdate) -> Result<u64, DatabaseError> {
        self.begin()?;
        let inventory = update.inventory_text()?;
        let challenges = update.challenges_text()?;

        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(user_id) {
            Some(row) => {
                row.points = update.points;
                row.inventory = inventory;
                row.challenges = challenges;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.begin()
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.api_key = API_KEY.to_string();
    config
}

pub fn build_test_app(store: Arc<FakeStore>) -> Router {
    build_test_app_with(test_config(), store)
}

pub fn build_test_app_with(config: AppConfig, store: Arc<FakeStore>) -> Router {
    app(AppState::new(config, store))
}

/// Request builder with a fixed client address and optional API key
pub fn request(method: Method, uri: &str, client_ip: &str, key: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("cf-connecting-ip", client_ip);

    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, "192.0.2.1", Some(API_KEY), None)).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, request(Method::PUT, uri, "192.0.2.1", Some(API_KEY), Some(body))).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

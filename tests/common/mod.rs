#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use url::Url;

use cold_api::auth::{mint_token, Claims};
use cold_api::config::AppConfig;
use cold_api::services::catalog::AnswerRecord;
use cold_api::services::{CatalogService, CatalogSnapshot, QueryClassifier, ServiceError};
use cold_api::AppState;

pub const API_KEY: &str = "test-api-key";

/// Classifier double that echoes the query and counts calls.
#[derive(Default)]
pub struct MockClassifier {
    pub calls: AtomicUsize,
}

#[async_trait]
impl QueryClassifier for MockClassifier {
    async fn classify_user_query(&self, query: &str) -> Result<Value, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "query": query, "category": "choice_of_law", "confidence": 0.92 }))
    }
}

pub fn config(secret: &str, api_key: Option<&str>) -> AppConfig {
    let mut vars = HashMap::from([("JWT_SECRET".to_string(), secret.to_string())]);
    if let Some(key) = api_key {
        vars.insert("API_KEY".to_string(), key.to_string());
    }
    AppConfig::from_lookup(move |k| vars.get(k).cloned()).expect("valid test config")
}

pub fn snapshot() -> CatalogSnapshot {
    CatalogSnapshot {
        jurisdictions: vec!["CHE".into(), "DEU".into(), "NOR".into()],
        answers: vec![
            AnswerRecord { id: "CHE_01-P".into(), jurisdiction: "CHE".into() },
            AnswerRecord { id: "DEU_01-P".into(), jurisdiction: "DEU".into() },
        ],
        questions: vec!["01-P".into(), "02-P".into()],
        literature: vec!["17".into()],
        regional_instruments: vec!["EU-Rome-I".into()],
        international_instruments: vec!["HCCH-2015".into()],
        court_decisions: vec!["CHE-4A_1-2020".into()],
        domestic_instruments: vec!["CHE-PILA".into()],
    }
}

pub fn state_with(secret: &str, api_key: Option<&str>, classifier: Arc<MockClassifier>) -> AppState {
    let catalog = Arc::new(
        CatalogService::new(snapshot(), Url::parse("https://cold.global").unwrap()).unwrap(),
    );
    AppState::new(config(secret, api_key), catalog.clone(), catalog, classifier).unwrap()
}

pub fn state(secret: &str) -> AppState {
    state_with(secret, Some(API_KEY), Arc::new(MockClassifier::default()))
}

pub fn app(secret: &str) -> axum::Router {
    cold_api::app(state(secret))
}

pub fn token(secret: &str) -> String {
    mint_token(secret, &Claims::new("u", "admin")).unwrap()
}

pub fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// A running server on an ephemeral port, for end-to-end tests over real HTTP.
pub struct TestServer {
    pub base_url: String,
}

pub async fn spawn_server(state: AppState) -> Result<TestServer> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind ephemeral port")?;
    let addr = listener.local_addr()?;
    let app = cold_api::app(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });

    Ok(TestServer { base_url: format!("http://{}", addr) })
}

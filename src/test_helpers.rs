//! Test helper factories and mock state builders
//!
//! Provides property-map shorthand, mock AppState builders over
//! `MockGraphStore`, stand-in transcoders and a one-shot JSON request helper.
#![allow(dead_code)]

use crate::graph::GraphManager;
use crate::media::{MediaError, Transcoder, VideoConverter};
use crate::neo4j::mock::MockGraphStore;
use crate::neo4j::{PropertyMap, PropertyValue};
use crate::{AppState, Config};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

// ============================================================================
// Property maps
// ============================================================================

/// Build a property map from a JSON object literal
pub fn props(value: serde_json::Value) -> PropertyMap {
    match value {
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| (k, PropertyValue::from(v)))
            .collect(),
        other => panic!("props() expects a JSON object, got {other}"),
    }
}

// ============================================================================
// Transcoders
// ============================================================================

/// Copies the input to the output and remembers what it saw
#[derive(Default)]
pub struct CopyTranscoder {
    pub seen: Mutex<Vec<(PathBuf, PathBuf)>>,
}

#[async_trait]
impl Transcoder for CopyTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), MediaError> {
        tokio::fs::copy(input, output).await?;
        self.seen
            .lock()
            .unwrap()
            .push((input.to_path_buf(), output.to_path_buf()));
        Ok(())
    }
}

/// Always fails like an encoder exiting non-zero
pub struct FailingTranscoder;

#[async_trait]
impl Transcoder for FailingTranscoder {
    async fn transcode(&self, _input: &Path, _output: &Path) -> Result<(), MediaError> {
        Err(MediaError::Encoder("exit status: 1".into()))
    }
}

// ============================================================================
// Mock state builders
// ============================================================================

pub fn test_config(output_dir: &Path) -> Config {
    Config {
        neo4j_uri: "neo4j://mock:7687".to_string(),
        neo4j_user: "neo4j".to_string(),
        neo4j_password: "mock".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        video_output_dir: output_dir.to_path_buf(),
        ffmpeg_path: "ffmpeg".to_string(),
        max_upload_bytes: 1024 * 1024,
    }
}

/// AppState over the given store and transcoder, writing videos to `output_dir`
pub fn app_state(
    store: Arc<MockGraphStore>,
    transcoder: Arc<dyn Transcoder>,
    output_dir: &Path,
) -> AppState {
    AppState {
        graph: Arc::new(GraphManager::new(store)),
        media: Arc::new(VideoConverter::new(output_dir, transcoder)),
        config: Arc::new(test_config(output_dir)),
    }
}

/// AppState over a pre-seeded store
pub fn mock_app_state_with_store(store: Arc<MockGraphStore>) -> AppState {
    let output_dir = std::env::temp_dir().join("graph-gateway-test-videos");
    app_state(store, Arc::new(CopyTranscoder::default()), &output_dir)
}

/// AppState over an empty store; the store is returned for assertions
pub fn mock_app_state() -> (AppState, Arc<MockGraphStore>) {
    let store = Arc::new(MockGraphStore::new());
    (mock_app_state_with_store(store.clone()), store)
}

// ============================================================================
// Requests
// ============================================================================

/// Send one request through the router and decode the JSON response
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

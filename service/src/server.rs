//! HTTP trigger surface: a one-pass trigger and a liveness probe.
//!
//! `GET /process` runs one pass and answers with the aggregate message
//! only; per-file failures are visible in the service logs, not in the
//! response. `GET /health` is a static liveness indicator.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::error;

use crate::relay::Relay;

pub type SharedRelay = Arc<Mutex<Relay>>;

pub fn router(relay: SharedRelay) -> Router {
    Router::new()
        .route("/process", get(process))
        .route("/health", get(health))
        .with_state(relay)
}

async fn process(State(relay): State<SharedRelay>) -> (StatusCode, Json<Value>) {
    // The lock is taken inside the blocking task: concurrent triggers
    // queue here and run one pass at a time against the shared session.
    let result = tokio::task::spawn_blocking(move || {
        let mut relay = relay.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        relay.run_pass()
    })
    .await;

    match result {
        Ok(Ok(outcome)) => (StatusCode::OK, Json(json!({ "message": outcome.message() }))),
        Ok(Err(e)) => {
            error!("processing pass failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        }
        Err(e) => {
            error!("processing task failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

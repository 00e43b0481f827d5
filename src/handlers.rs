use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, SendError};
use crate::spark::SparkClient;
use crate::types::{HealthResponse, Recipient, SendRequest, SendResponse};

pub struct AppState {
    pub spark: SparkClient,
}

/// Builds the API router. Shared between `main` and the integration tests.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/send", post(send_message))
        .route("/api/health", get(health))
        .with_state(state)
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Recipient validation runs before any body construction or network I/O.
    let recipient = Recipient::from_fields(
        req.room.as_deref(),
        req.person_id.as_deref(),
        req.person_email.as_deref(),
    )?;

    if req.check_mode {
        info!("Check mode: would send message to {}", recipient);
        return Ok(Json(SendResponse {
            changed: false,
            result: Value::Null,
        }));
    }

    let send_id = Uuid::new_v4();
    info!("Sending message {} to {}", send_id, recipient);

    let body = state
        .spark
        .send(&req.token, &recipient, &req.msg)
        .await
        .map_err(|err| {
            if let SendError::Status { status, body } = &err {
                warn!("Message {} rejected: status={} body={}", send_id, status, body);
            } else {
                warn!("Message {} failed: {}", send_id, err);
            }
            err
        })?;

    info!("Message {} accepted", send_id);

    // Pass the upstream body through unmodified; non-JSON bodies are kept
    // as a plain string.
    let result = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
    Ok(Json(SendResponse {
        changed: true,
        result,
    }))
}

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

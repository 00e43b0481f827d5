use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::IntoResponse;
use log::info;
use tower_http::cors::CorsLayer;

use spark_notify::handlers::{app, AppState};
use spark_notify::spark::{SparkClient, DEFAULT_API_BASE};

async fn auth_middleware(
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, StatusCode> {
    let api_key = std::env::var("SPARK_NOTIFY_API_KEY").unwrap_or_default();

    if api_key.is_empty() {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);

    if token == api_key {
        Ok(next.run(req).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();

    let base_url = std::env::var("SPARK_NOTIFY_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
    let port: u16 = std::env::var("SPARK_NOTIFY_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8788);

    info!("Spark API base: {}", base_url);

    let state = Arc::new(AppState {
        spark: SparkClient::new(&base_url),
    });

    let app = app(state)
        .layer(middleware::from_fn(auth_middleware))
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", port);
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

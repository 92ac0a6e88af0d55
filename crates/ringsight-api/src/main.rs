//! HTTP intake service.
//!
//! Endpoints:
//! - `POST /analyze` - multipart CSV upload, returns the JSON report
//! - `POST /sample`  - analyse the built-in synthetic dataset
//! - `GET  /health`  - liveness probe
//! - `GET  /`        - service banner

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use ringsight_core::config::EngineConfig;
use ringsight_engine::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Upload size ceiling: a 10k-transaction CSV stays far below this.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    config: EngineConfig,
}

/// Structured error body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    code: String,
    message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(code: &str, message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            code: code.to_string(),
            message: message.into(),
        }),
    )
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = Arc::new(AppState {
        config: EngineConfig::default(),
    });

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/analyze", post(analyze_upload))
        .route("/sample", post(analyze_sample))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = format!("0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("bind listener");
    tracing::info!(%addr, "ringsight API listening");
    axum::serve(listener, app).await.expect("serve");
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ringsight API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Accept a CSV upload and run the pipeline over it.
async fn analyze_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Report>, ApiError> {
    let started = Instant::now();

    let mut upload: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request("MALFORMED_MULTIPART", e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if let Some(filename) = field.file_name() {
            if !filename.to_lowercase().ends_with(".csv") {
                return Err(bad_request(
                    "UNSUPPORTED_FILE_TYPE",
                    "only CSV files are supported",
                ));
            }
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request("UPLOAD_READ_FAILED", e.to_string()))?;
        upload = Some(bytes.to_vec());
        break;
    }

    let Some(bytes) = upload else {
        return Err(bad_request("MISSING_FILE", "multipart field 'file' not found"));
    };

    let ingest = ringsight_ingest::read_transactions(&bytes)
        .map_err(|e| bad_request("INVALID_INPUT", e.to_string()))?;

    let mut report = run_pipeline(&ingest.transactions, &state.config)?;
    report.summary.rows_rejected = ingest.rejected.total();

    tracing::info!(
        transactions = report.summary.total_transactions,
        rejected = report.summary.rows_rejected,
        rings = report.summary.fraud_rings_detected,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "upload analysed"
    );
    Ok(Json(report))
}

/// Analyse the built-in synthetic dataset.
async fn analyze_sample(State(state): State<Arc<AppState>>) -> Result<Json<Report>, ApiError> {
    let batch = generate_sample();
    let report = run_pipeline(&batch, &state.config)?;
    Ok(Json(report))
}

fn run_pipeline(
    transactions: &[ringsight_graph::Transaction],
    config: &EngineConfig,
) -> Result<Report, ApiError> {
    analyze(transactions, config).map_err(|e| {
        tracing::error!(error = %e, "pipeline failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                code: "PIPELINE_ABORTED".to_string(),
                message: e.to_string(),
            }),
        )
    })
}

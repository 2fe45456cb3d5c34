//! name-oracle HTTP server.
//!
//! - `POST /oracle` with `{"name": "...", "lens": "hebrew"}` returns the full reading
//! - `POST /transliterate` with the same body returns only the script and per-word details
//! - `GET  /lenses` lists the script profiles with their tables
//! - `GET  /health` reports server status
//!
//! Build and run: `cargo run --features server --bin name-oracle-server`

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use name_oracle::config::OracleConfig;
use name_oracle::core::engine::{join_words, words_to_json};
use name_oracle::OracleEngine;

type ApiError = (StatusCode, String);

// ── Request / response types ───────────────────────────────────────────────

#[derive(Deserialize)]
struct NameRequest {
    /// Missing names read as empty, which yields an empty script.
    #[serde(default, alias = "text")]
    name: String,
    #[serde(default)]
    lens: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    default_lens: String,
    interpreter: bool,
}

struct ServerState {
    engine: OracleEngine,
    default_lens: String,
}

impl ServerState {
    fn lens<'a>(&'a self, requested: &'a Option<String>) -> &'a str {
        requested.as_deref().unwrap_or(&self.default_lens)
    }
}

// ── Handlers ───────────────────────────────────────────────────────────────

async fn health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        default_lens: state.engine.registry().default_lens().to_string(),
        interpreter: state.engine.has_interpreter(),
    })
}

async fn lenses(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    serde_json::to_value(state.engine.lenses())
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("failed to encode lenses: {e}")))
}

async fn oracle(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<NameRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // Dictionary lookups and the translation call both block.
    let reading = tokio::task::spawn_blocking(move || {
        let lens = state.lens(&req.lens).to_string();
        state.engine.read(&req.name, &lens)
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("oracle task failed: {e}")))?;

    Ok(Json(reading.to_json()))
}

async fn transliterate(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<NameRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let body = tokio::task::spawn_blocking(move || {
        let profile = state.engine.resolve(state.lens(&req.lens));
        let words = state.engine.transliterate_words(&req.name, &profile.lens);
        let script = join_words(&words);
        serde_json::json!({
            "input": req.name,
            "lens": profile.lens,
            "script": script,
            "words": words_to_json(&words),
        })
    })
    .await
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("transliteration task failed: {e}"),
        )
    })?;

    Ok(Json(body))
}

// ── Main ───────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = OracleConfig::discover().unwrap_or_else(|e| {
        tracing::error!("failed to load config: {e}");
        std::process::exit(1);
    });
    let engine = OracleEngine::from_config(&config).unwrap_or_else(|e| {
        tracing::error!("failed to build oracle engine: {e}");
        std::process::exit(1);
    });

    let addr = config.server.address();
    let state = Arc::new(ServerState {
        engine,
        default_lens: config.default_lens,
    });

    let app = Router::new()
        .route("/health", get(health))
        .route("/lenses", get(lenses))
        .route("/oracle", post(oracle))
        .route("/transliterate", post(transliterate))
        .layer(CorsLayer::permissive())
        .with_state(state);

    tracing::info!("name-oracle server listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}

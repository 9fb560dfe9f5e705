use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    engine::{FrameStats, Status, Worker},
    scenario::Scenario,
    snapshot::MapSnapshot,
};

#[derive(Clone)]
struct AppState {
    worker: Arc<Worker>,
    scenario_name: String,
}

pub struct WebServerConfig {
    pub scenario: Scenario,
    pub seed: Option<u64>,
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize)]
struct StatusRequest {
    seed: u64,
}

#[derive(Serialize)]
struct StatsResponse {
    scenario: String,
    running: bool,
    frames: u64,
    current: Status,
    average_render_ms: Option<f64>,
    recent: Vec<FrameStats>,
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        scenario,
        seed,
        host,
        port,
    } = config;

    let worker = Worker::new(scenario.build_map(), scenario.status(seed), scenario.worker)
        .context("initial render failed")?;
    worker.start()?;
    let worker = Arc::new(worker);

    let state = Arc::new(AppState {
        worker: worker.clone(),
        scenario_name: scenario.name.clone(),
    });

    let router = router(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid address {host}:{port}"))?;

    info!(scenario = %scenario.name, %addr, "serving map (Ctrl+C to stop)");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tokio::task::spawn_blocking(move || worker.stop()).await??;
    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(ascii_map))
        .route("/api/map", get(latest_map))
        .route("/api/stats", get(stats))
        .route("/api/status", post(update_status))
        .with_state(state)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down web server");
}

fn capture(state: &AppState) -> MapSnapshot {
    let instance = state.worker.get_current_snapshot();
    let seed = state.worker.current_status().seed;
    MapSnapshot::capture(&state.scenario_name, seed, &instance)
}

async fn ascii_map(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        capture(&state).to_ascii(),
    )
}

async fn latest_map(State(state): State<Arc<AppState>>) -> Json<MapSnapshot> {
    Json(capture(&state))
}

async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let worker = &state.worker;
    Json(StatsResponse {
        scenario: state.scenario_name.clone(),
        running: worker.is_running(),
        frames: worker.frame_count(),
        current: worker.current_status(),
        average_render_ms: worker.average_render_ms(),
        recent: worker.recent_stats(),
    })
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StatusRequest>,
) -> impl IntoResponse {
    let settings = state.worker.current_status().settings;
    match state
        .worker
        .set_new_status(Status::new(request.seed, settings))
    {
        Ok(()) => (StatusCode::ACCEPTED, String::new()),
        Err(err) => {
            warn!(%err, "status update refused");
            (StatusCode::BAD_REQUEST, err.to_string())
        }
    }
}

//! REST control surface. Every route is a thin pass-through to [`Theremin`].

use crate::config::ThereminConfig;
use crate::engine::{Theremin, ThereminStatus};
use crate::synth::Waveform;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info};

#[derive(Debug, Serialize)]
struct ApiMessage {
    success: bool,
    message: String,
}

impl ApiMessage {
    fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
        })
    }

    fn fail(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            message: message.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct WaveTypeRequest {
    wave_type: String,
}

#[derive(Debug, Serialize)]
struct FrameResponse {
    success: bool,
    frame: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    system: &'static str,
    timestamp: f64,
}

#[derive(Debug, Serialize)]
struct DebugResponse {
    frame_available: bool,
    frame_length: usize,
    theremin_running: bool,
    last_status: ThereminStatus,
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

pub fn router(theremin: Arc<Theremin>) -> Router {
    Router::new()
        .route("/api/start", post(start))
        .route("/api/stop", post(stop))
        .route("/api/status", get(status))
        .route("/api/wave_type", post(wave_type))
        .route("/api/frame", get(frame))
        .route("/api/config", get(config))
        .route("/api/health", get(health))
        .route("/api/debug", get(debug))
        .with_state(theremin)
}

/// Bind and serve until the task is cancelled.
pub async fn serve(theremin: Arc<Theremin>, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "API listening");
    axum::serve(listener, router(theremin))
        .await
        .context("serving API")?;
    Ok(())
}

async fn start(State(theremin): State<Arc<Theremin>>) -> (StatusCode, Json<ApiMessage>) {
    match theremin.start() {
        Ok(()) => (StatusCode::OK, ApiMessage::ok("theremin started")),
        Err(err) => {
            error!(err = %format!("{err:#}"), "start failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiMessage::fail(format!("failed to start: {err:#}")),
            )
        }
    }
}

async fn stop(State(theremin): State<Arc<Theremin>>) -> (StatusCode, Json<ApiMessage>) {
    match theremin.stop() {
        Ok(()) => (StatusCode::OK, ApiMessage::ok("theremin stopped")),
        Err(err) => {
            error!(err = %format!("{err:#}"), "stop failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiMessage::fail(format!("failed to stop: {err:#}")),
            )
        }
    }
}

async fn status(State(theremin): State<Arc<Theremin>>) -> Json<ThereminStatus> {
    Json(theremin.status())
}

async fn wave_type(
    State(theremin): State<Arc<Theremin>>,
    Json(request): Json<WaveTypeRequest>,
) -> (StatusCode, Json<ApiMessage>) {
    match request.wave_type.parse::<Waveform>() {
        Ok(waveform) => {
            theremin.set_wave_type(waveform);
            (
                StatusCode::OK,
                ApiMessage::ok(format!("waveform changed to {waveform}")),
            )
        }
        Err(err) => (StatusCode::BAD_REQUEST, ApiMessage::fail(err)),
    }
}

async fn frame(State(theremin): State<Arc<Theremin>>) -> Json<FrameResponse> {
    match theremin.latest_frame() {
        Some(frame) => Json(FrameResponse {
            success: true,
            frame: Some(frame),
            timestamp: Some(unix_now()),
            message: None,
        }),
        None => Json(FrameResponse {
            success: false,
            frame: None,
            timestamp: None,
            message: Some("no frame available".to_string()),
        }),
    }
}

async fn config(State(theremin): State<Arc<Theremin>>) -> Json<ThereminConfig> {
    Json(theremin.config().clone())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        system: "rusttheremin API",
        timestamp: unix_now(),
    })
}

async fn debug(State(theremin): State<Arc<Theremin>>) -> Json<DebugResponse> {
    let frame = theremin.latest_frame();
    Json(DebugResponse {
        frame_available: frame.is_some(),
        frame_length: frame.map(|f| f.len()).unwrap_or(0),
        theremin_running: theremin.is_running(),
        last_status: theremin.status(),
    })
}

//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{info, warn};

use crate::{
    error::AppError,
    state::{AppState, RunState},
};
use super::responses::{
    AdjustRequest, ApiResponse, DisplayResponse, FileRequest, FileResponse, HealthResponse,
    SettingRequest, SettingResponse, StatusResponse,
};

fn control_response(state: &AppState, message: String, run_state: RunState) -> Json<ApiResponse> {
    Json(ApiResponse::ok(message, run_state, state.get_display_frame()))
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, AppError> {
    let run_state = state.start()?;
    info!("Start endpoint called");
    Ok(control_response(&state, "Timer running".to_string(), run_state))
}

/// Handle POST /pause - Freeze the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, AppError> {
    let run_state = state.pause()?;
    info!("Pause endpoint called");
    let message = match run_state {
        RunState::Paused => "Timer paused",
        _ => "Timer was not running",
    };
    Ok(control_response(&state, message.to_string(), run_state))
}

/// Handle POST /stop - Stop and show the finished text
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, AppError> {
    let run_state = state.stop()?;
    info!("Stop endpoint called");
    Ok(control_response(&state, "Timer stopped".to_string(), run_state))
}

/// Handle POST /next - Load the queued speaker
pub async fn next_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, AppError> {
    let run_state = state.next()?;
    info!("Next endpoint called");
    Ok(control_response(&state, "Next speaker loaded".to_string(), run_state))
}

async fn adjust_by(state: &AppState, seconds: i64) -> Result<Json<ApiResponse>, AppError> {
    let duration = state.adjust(seconds)?;
    let run_state = state.get_timer_snapshot()?.run_state;
    Ok(control_response(
        state,
        format!("Duration is now {}s", duration),
        run_state,
    ))
}

/// Handle POST /adjust - Change the duration by a signed number of seconds
pub async fn adjust_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdjustRequest>,
) -> Result<Json<ApiResponse>, AppError> {
    adjust_by(&state, request.seconds).await
}

/// Handle POST /add-minute
pub async fn add_minute_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, AppError> {
    adjust_by(&state, 60).await
}

/// Handle POST /subtract-minute
pub async fn subtract_minute_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, AppError> {
    adjust_by(&state, -60).await
}

/// Handle POST /open - Load a settings file
pub async fn open_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FileRequest>,
) -> Result<Json<FileResponse>, AppError> {
    state.open(&request.path)?;
    Ok(Json(FileResponse::ok(request.path)))
}

/// Handle POST /save - Save to the bound settings file
pub async fn save_handler(State(state): State<Arc<AppState>>) -> Result<Json<FileResponse>, AppError> {
    match state.save() {
        Ok(path) => Ok(Json(FileResponse::ok(path))),
        Err(e) => {
            warn!("Save failed, client should fall back to save-as: {}", e);
            Err(e)
        }
    }
}

/// Handle POST /save-as - Save to a new settings file
pub async fn save_as_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FileRequest>,
) -> Result<Json<FileResponse>, AppError> {
    let path = state.save_as(&request.path)?;
    Ok(Json(FileResponse::ok(path)))
}

/// Handle GET /settings - Dump every settings group
pub async fn settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(state.dump_settings()?))
}

/// Handle GET /settings/:path - Read one leaf
pub async fn get_setting_handler(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Json<SettingResponse>, AppError> {
    let value = state.get_setting(&path)?;
    Ok(Json(SettingResponse { path, value }))
}

/// Handle PUT /settings/:path - Replace one leaf
pub async fn put_setting_handler(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Json(request): Json<SettingRequest>,
) -> Result<Json<SettingResponse>, AppError> {
    let value = state.set_setting(&path, request.value)?;
    info!("Setting {} updated to {}", path, value);
    Ok(Json(SettingResponse { path, value }))
}

/// Handle GET /display - Current display mirror with resolved colours and layout
pub async fn display_handler(State(state): State<Arc<AppState>>) -> Result<Json<DisplayResponse>, AppError> {
    let frame = state.get_display_frame();
    Ok(Json(DisplayResponse {
        rendered: frame.render(),
        layout: state.get_layout()?,
        frame,
    }))
}

/// Handle GET /display/events - Stream rendered frames as they change
pub async fn display_events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe_display();
    let frames = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let rendered = rx.borrow_and_update().render();
        let event = Event::default()
            .event("display")
            .json_data(&rendered)
            .unwrap_or_else(|e| Event::default().comment(format!("frame not serializable: {}", e)));
        Some((Ok(event), (rx, false)))
    });
    Sse::new(frames).keep_alive(KeepAlive::default())
}

/// Handle GET /status - Timer and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, AppError> {
    let timer = state.get_timer_snapshot()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

//! API request and response structures

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    display::{DisplayFrame, FrameLayout, RenderedFrame},
    settings::Value,
    state::{RunState, TimerSnapshot},
};

/// API response structure for control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub run_state: RunState,
    pub display: DisplayFrame,
}

impl ApiResponse {
    /// Create a successful response
    pub fn ok(message: String, run_state: RunState, display: DisplayFrame) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            run_state,
            display,
        }
    }
}

/// Body of POST /adjust
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustRequest {
    pub seconds: i64,
}

/// Body of POST /open and POST /save-as
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRequest {
    pub path: PathBuf,
}

/// Body of PUT /settings/:path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingRequest {
    pub value: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingResponse {
    pub path: String,
    pub value: Value,
}

/// Result of an open or save
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponse {
    pub status: String,
    pub path: PathBuf,
    pub timestamp: DateTime<Utc>,
}

impl FileResponse {
    pub fn ok(path: PathBuf) -> Self {
        Self {
            status: "ok".to_string(),
            path,
            timestamp: Utc::now(),
        }
    }
}

/// What an output should currently show
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayResponse {
    pub frame: DisplayFrame,
    pub rendered: RenderedFrame,
    pub layout: FrameLayout,
}

/// Status response with timer information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

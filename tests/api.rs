use std::{fs, sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use meeting_timer::{create_router, AppState, SettingsTree};

fn app_with(settings: SettingsTree) -> Router {
    let state = AppState::new(settings, 0, "127.0.0.1".into(), Duration::from_millis(100)).unwrap();
    create_router(Arc::new(state))
}

fn app() -> Router {
    app_with(SettingsTree::new(None))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health() {
    let (status, body) = call(&app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn start_pause_stop_cycle() {
    let app = app();

    let (status, body) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["run_state"], "running");
    assert_eq!(body["display"]["time"], "09:00");

    let (_, body) = call(&app, "POST", "/pause", None).await;
    assert_eq!(body["run_state"], "paused");
    let (_, body) = call(&app, "POST", "/pause", None).await;
    assert_eq!(body["run_state"], "paused");

    let (_, body) = call(&app, "POST", "/stop", None).await;
    assert_eq!(body["run_state"], "stopped");
    assert_eq!(body["display"]["time"], "STOP");
    assert_eq!(body["display"]["foreground"], "red");

    let (_, status) = call(&app, "GET", "/status", None).await;
    assert_eq!(status["timer"]["run_state"], "stopped");
    assert_eq!(status["last_action"], "stop");
}

#[tokio::test]
async fn next_uses_edited_queue() {
    let app = app();
    let (status, _) = call(
        &app,
        "PUT",
        "/settings/next.duration",
        Some(json!({"value": "90"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    call(&app, "PUT", "/settings/next.speaker", Some(json!({"value": "Linus"}))).await;

    let (_, body) = call(&app, "POST", "/next", None).await;
    assert_eq!(body["display"]["time"], "01:30");
    assert_eq!(body["display"]["speaker"], "Linus");
    assert_eq!(body["display"]["foreground"], "green");

    let (_, status) = call(&app, "GET", "/status", None).await;
    assert_eq!(status["timer"]["duration"], 90);
}

#[tokio::test]
async fn adjust_endpoints() {
    let app = app();
    let (_, body) = call(&app, "POST", "/add-minute", None).await;
    assert_eq!(body["message"], "Duration is now 600s");
    let (_, body) = call(&app, "POST", "/adjust", Some(json!({"seconds": -700}))).await;
    assert_eq!(body["message"], "Duration is now -100s");
    call(&app, "POST", "/subtract-minute", None).await;
    let (_, status) = call(&app, "GET", "/status", None).await;
    assert_eq!(status["timer"]["duration"], -160);
}

#[tokio::test]
async fn settings_errors_map_to_status_codes() {
    let app = app();
    let (status, body) = call(&app, "GET", "/settings/colour.nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);

    let (status, _) = call(
        &app,
        "PUT",
        "/settings/initial.warning",
        Some(json!({"value": "a minute"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = call(&app, "GET", "/settings/initial.warning", None).await;
    assert_eq!(body["value"], 60);
}

#[tokio::test]
async fn settings_dump_includes_display() {
    let (_, body) = call(&app(), "GET", "/settings", None).await;
    assert_eq!(body["colour"]["primary"], "green");
    assert_eq!(body["display"]["speaker"], "Welcome");
    assert_eq!(body["finished_text"], "STOP");
}

#[tokio::test]
async fn display_resolves_colours_and_layout() {
    let app = app();
    call(&app, "PUT", "/settings/display.background", Some(json!({"value": "Midnight Blue"}))).await;
    let (status, body) = call(&app, "GET", "/display", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["frame"]["background"], "Midnight Blue");
    assert_eq!(body["rendered"]["background"]["hex"], "#191970");
    assert_eq!(body["rendered"]["foreground"]["rgb"], json!([0, 128, 0]));
    assert_eq!(body["layout"]["height"], 720);
}

#[tokio::test]
async fn save_falls_back_to_save_as() {
    let app = app();
    let (status, _) = call(&app, "POST", "/save", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("webinar.mt");
    call(&app, "PUT", "/settings/colour.primary", Some(json!({"value": "purple"}))).await;
    let (status, _) = call(
        &app,
        "POST",
        "/save-as",
        Some(json!({"path": path.to_str().unwrap()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, "POST", "/save", None).await;
    assert_eq!(status, StatusCode::OK);

    let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["colour"]["primary"], "purple");
    assert!(saved.get("display").is_none());
}

#[tokio::test]
async fn open_loads_file_and_rejects_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("talks.mt");
    fs::write(&path, r#"{"next": {"title": "Lightning talks", "duration": 300}}"#).unwrap();

    let app = app();
    let (status, _) = call(
        &app,
        "POST",
        "/open",
        Some(json!({"path": dir.path().join("absent.mt").to_str().unwrap()})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "POST", "/open", Some(json!({"path": path.to_str().unwrap()}))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, "POST", "/next", None).await;
    assert_eq!(body["display"]["title"], "Lightning talks");
    assert_eq!(body["display"]["time"], "05:00");
}

#[tokio::test]
async fn startup_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.mt");
    fs::write(
        &path,
        r#"{"initial": {"title": "All Hands", "speaker": "CEO", "duration": 1200}}"#,
    )
    .unwrap();

    let app = app_with(SettingsTree::new(Some(path)));
    let (_, body) = call(&app, "GET", "/display", None).await;
    assert_eq!(body["frame"]["title"], "All Hands");
    assert_eq!(body["frame"]["speaker"], "CEO");
    let (_, status) = call(&app, "GET", "/status", None).await;
    assert_eq!(status["timer"]["duration"], 1200);
}

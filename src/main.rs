//! Meeting Timer - A countdown timer controller for live presentations
//!
//! This is the main entry point for the meeting-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use meeting_timer::{
    api::create_router,
    config::Config,
    settings::SettingsTree,
    state::AppState,
    tasks::ticker_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("meeting_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting meeting-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick={}ms, settings={}",
        config.host,
        config.port,
        config.tick_ms,
        config
            .settings_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<defaults>".to_string())
    );

    // Loading a named settings file happens here; a missing file is fatal
    let settings = SettingsTree::new(config.settings_file.clone());
    let state = Arc::new(AppState::new(
        settings,
        config.port,
        config.host.clone(),
        config.tick_interval(),
    )?);

    // Start the periodic tick task
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        ticker_task(tick_state).await;
    });

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start | /pause | /stop | /next  - Timer controls");
    info!("  POST /adjust | /add-minute | /subtract-minute - Change duration");
    info!("  POST /open | /save | /save-as       - Settings file");
    info!("  GET  /settings, GET|PUT /settings/:path - Settings tree");
    info!("  GET  /display, /display/events      - Display mirror");
    info!("  GET  /status | /health");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

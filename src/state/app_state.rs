//! Shared timer session used by the tick task and the HTTP handlers

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use super::{RunState, TimerEngine};
use crate::{
    display::{DisplayFrame, FrameLayout},
    error::{AppError, SettingsError},
    settings::{paths, SettingsTree, Value},
};

/// Point-in-time view of the timer for status reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub run_state: RunState,
    pub duration: i64,
    pub warning: i64,
    pub remaining: Option<i64>,
    pub settings_file: Option<PathBuf>,
}

/// Main application state: one timer session plus server metadata
#[derive(Debug)]
pub struct AppState {
    /// Engine and settings tree; every access goes through this lock
    pub engine: Arc<Mutex<TimerEngine>>,
    /// Period of the tick task
    pub tick_interval: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Latest display mirror, fed by subscriptions on the display leaves
    pub display_tx: Arc<watch::Sender<DisplayFrame>>,
    /// Keep the receiver alive to prevent channel closure
    pub _display_rx: watch::Receiver<DisplayFrame>,
}

impl AppState {
    /// Build a session from a settings tree and wire the display mirror.
    ///
    /// Fails if the tree's bound settings file cannot be loaded.
    pub fn new(
        settings: SettingsTree,
        port: u16,
        host: String,
        tick_interval: Duration,
    ) -> Result<Self, AppError> {
        let mut engine = TimerEngine::new(settings)?;

        let initial = DisplayFrame::from_settings(engine.settings_mut());
        let (display_tx, display_rx) = watch::channel(initial);
        let display_tx = Arc::new(display_tx);

        for path in paths::DISPLAY {
            let tx = Arc::clone(&display_tx);
            engine.settings_mut().subscribe(path, move |value: &Value| {
                tx.send_modify(|frame| {
                    frame.apply(path, value);
                });
            })?;
        }

        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            tick_interval,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            display_tx,
            _display_rx: display_rx,
        })
    }

    fn lock_engine(&self) -> Result<MutexGuard<'_, TimerEngine>, AppError> {
        self.engine
            .lock()
            .map_err(|e| AppError::Lock(format!("timer engine: {}", e)))
    }

    /// Run an operation against the engine and record it as the last action
    pub fn control<F, T>(&self, action: &str, operation: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut TimerEngine) -> Result<T, SettingsError>,
    {
        let result = {
            let mut engine = self.lock_engine()?;
            operation(&mut *engine)?
        };

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
        Ok(result)
    }

    pub fn start(&self) -> Result<RunState, AppError> {
        self.control("start", |engine| {
            let now = Instant::now();
            engine.start(now);
            engine.tick(now);
            Ok(engine.run_state())
        })
    }

    pub fn pause(&self) -> Result<RunState, AppError> {
        self.control("pause", |engine| {
            engine.pause(Instant::now());
            Ok(engine.run_state())
        })
    }

    pub fn stop(&self) -> Result<RunState, AppError> {
        self.control("stop", |engine| {
            engine.stop();
            Ok(engine.run_state())
        })
    }

    pub fn next(&self) -> Result<RunState, AppError> {
        self.control("next", |engine| {
            engine.next();
            Ok(engine.run_state())
        })
    }

    pub fn adjust(&self, delta_seconds: i64) -> Result<i64, AppError> {
        self.control("adjust", |engine| {
            engine.adjust(delta_seconds);
            Ok(engine.duration())
        })
    }

    /// Evaluate the timer now; called by the tick task
    pub fn tick(&self) -> Result<(), AppError> {
        let mut engine = self.lock_engine()?;
        engine.tick(Instant::now());
        Ok(())
    }

    /// Load settings from `path`, which becomes the bound file
    pub fn open(&self, path: &Path) -> Result<(), AppError> {
        info!("Opening settings file {}", path.display());
        self.control("open", |engine| engine.settings_mut().read(Some(path)))
    }

    /// Save to the bound file.
    ///
    /// Fails with `FileNotFound` when no existing file is bound, in which
    /// case the caller should fall back to [`AppState::save_as`].
    pub fn save(&self) -> Result<PathBuf, AppError> {
        self.control("save", |engine| {
            let settings = engine.settings_mut();
            let bound = settings
                .path()
                .filter(|path| path.is_file())
                .map(Path::to_path_buf)
                .ok_or_else(|| {
                    SettingsError::FileNotFound("no existing settings file, use save-as".into())
                })?;
            settings.write(None)?;
            Ok(bound)
        })
    }

    /// Save to `path`, which becomes the bound file
    pub fn save_as(&self, path: &Path) -> Result<PathBuf, AppError> {
        self.control("save-as", |engine| {
            engine.settings_mut().write(Some(path))?;
            Ok(path.to_path_buf())
        })
    }

    pub fn get_setting(&self, path: &str) -> Result<Value, AppError> {
        let mut engine = self.lock_engine()?;
        Ok(engine.settings_mut().get(path)?)
    }

    pub fn set_setting(&self, path: &str, value: Value) -> Result<Value, AppError> {
        self.control("set", |engine| {
            let settings = engine.settings_mut();
            settings.set(path, value)?;
            settings.get(path)
        })
    }

    /// Every settings group, display mirror included
    pub fn dump_settings(&self) -> Result<serde_json::Value, AppError> {
        Ok(self.lock_engine()?.settings().dump_all())
    }

    pub fn get_timer_snapshot(&self) -> Result<TimerSnapshot, AppError> {
        let engine = self.lock_engine()?;
        Ok(TimerSnapshot {
            run_state: engine.run_state(),
            duration: engine.duration(),
            warning: engine.warning(),
            remaining: engine.remaining(Instant::now()),
            settings_file: engine.settings().path().map(Path::to_path_buf),
        })
    }

    /// Current display mirror
    pub fn get_display_frame(&self) -> DisplayFrame {
        self.display_tx.borrow().clone()
    }

    pub fn subscribe_display(&self) -> watch::Receiver<DisplayFrame> {
        self.display_tx.subscribe()
    }

    pub fn get_layout(&self) -> Result<FrameLayout, AppError> {
        let mut engine = self.lock_engine()?;
        Ok(FrameLayout::from_settings(engine.settings_mut()))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

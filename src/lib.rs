//! Meeting Timer - A countdown timer controller for live presentations
//!
//! This library provides the timer state machine, the observable settings
//! tree behind it, and an HTTP control surface for the view layer.

pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod settings;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{AppError, SettingsError};
pub use settings::SettingsTree;
pub use state::{AppState, TimerEngine};
pub use utils::signals::shutdown_signal;

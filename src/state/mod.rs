//! State management module
//!
//! The countdown clock, the engine that drives it, and the shared session
//! wrapped around them.

pub mod app_state;
pub mod timer_engine;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, TimerSnapshot};
pub use timer_engine::TimerEngine;
pub use timer_state::{RunState, TimerState};

//! Clock fields of the countdown and the arithmetic over them

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Run state derived from which clock instants are set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Stopped,
    Running,
    Paused,
}

/// Countdown clock.
///
/// `pause_time` is only ever set while `start_time` is set.
#[derive(Debug, Clone)]
pub struct TimerState {
    start_time: Option<Instant>,
    pause_time: Option<Instant>,
    /// Signed seconds, adjustable without bounds
    pub duration: i64,
    /// Seconds remaining at which the warning colour kicks in
    pub warning: i64,
}

impl TimerState {
    /// Create a stopped timer
    pub fn new(duration: i64, warning: i64) -> Self {
        Self {
            start_time: None,
            pause_time: None,
            duration,
            warning,
        }
    }

    pub fn run_state(&self) -> RunState {
        match (self.start_time, self.pause_time) {
            (None, _) => RunState::Stopped,
            (Some(_), None) => RunState::Running,
            (Some(_), Some(_)) => RunState::Paused,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.start_time.is_none()
    }

    /// Start from stopped, or resume from paused excluding the paused interval.
    /// Does nothing while already running.
    pub fn start(&mut self, now: Instant) {
        match (self.start_time, self.pause_time.take()) {
            (Some(started), Some(paused)) => {
                self.start_time = Some(started + now.saturating_duration_since(paused));
            }
            (Some(_), None) => {}
            (None, _) => self.start_time = Some(now),
        }
    }

    /// Pause only while running
    pub fn pause(&mut self, now: Instant) {
        if self.run_state() == RunState::Running {
            self.pause_time = Some(now);
        }
    }

    pub fn clear(&mut self) {
        self.start_time = None;
        self.pause_time = None;
    }

    /// Time counted against the duration, or `None` while stopped
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        let started = self.start_time?;
        let until = self.pause_time.unwrap_or(now);
        Some(until.saturating_duration_since(started))
    }

    /// Whole seconds left, rounded down, or `None` while stopped
    pub fn remaining(&self, now: Instant) -> Option<i64> {
        let elapsed = self.elapsed(now)?;
        Some((self.duration as f64 - elapsed.as_secs_f64()).floor() as i64)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(540, 60)
    }
}

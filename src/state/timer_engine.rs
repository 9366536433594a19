//! Countdown engine: control operations and the periodic tick

use std::time::Instant;

use tracing::{debug, info, warn};

use super::timer_state::{RunState, TimerState};
use crate::{
    display::{format_remaining, ColourState, Palette},
    error::SettingsError,
    settings::{paths, SettingsTree, Value},
};

/// Owns the settings tree and the countdown clock.
///
/// Every visible result is written back through the tree's display leaves,
/// so subscribers see each change. Callers must serialize access.
#[derive(Debug)]
pub struct TimerEngine {
    settings: SettingsTree,
    timer: TimerState,
}

impl TimerEngine {
    /// Start a session from the `initial` group, loading the bound settings file if needed
    pub fn new(mut settings: SettingsTree) -> Result<Self, SettingsError> {
        let duration = settings.get_int(paths::INITIAL_DURATION)?;
        let warning = settings.get_int(paths::INITIAL_WARNING)?;
        let mut engine = Self {
            settings,
            timer: TimerState::new(duration, warning),
        };

        let palette = Palette::from_settings(&mut engine.settings);
        engine.show(paths::DISPLAY_FOREGROUND, &palette.primary);
        engine.show(paths::DISPLAY_BACKGROUND, &palette.background);
        for (from, to) in [
            (paths::INITIAL_TITLE, paths::DISPLAY_TITLE),
            (paths::INITIAL_TIME, paths::DISPLAY_TIME),
            (paths::INITIAL_SPEAKER, paths::DISPLAY_SPEAKER),
        ] {
            let text = engine.text(from);
            engine.show(to, &text);
        }

        info!(
            "Timer session ready: duration={}s, warning={}s",
            duration, warning
        );
        Ok(engine)
    }

    pub fn settings(&self) -> &SettingsTree {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsTree {
        &mut self.settings
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn run_state(&self) -> RunState {
        self.timer.run_state()
    }

    pub fn duration(&self) -> i64 {
        self.timer.duration
    }

    pub fn warning(&self) -> i64 {
        self.timer.warning
    }

    pub fn remaining(&self, now: Instant) -> Option<i64> {
        self.timer.remaining(now)
    }

    /// Start, or resume after a pause
    pub fn start(&mut self, now: Instant) {
        let before = self.timer.run_state();
        self.timer.start(now);
        if before != RunState::Running {
            info!("Timer {:?} -> Running", before);
        }
    }

    /// Freeze elapsed time; only has an effect while running
    pub fn pause(&mut self, now: Instant) {
        if self.timer.run_state() == RunState::Running {
            self.timer.pause(now);
            info!("Timer paused");
        } else {
            debug!("Pause ignored while {:?}", self.timer.run_state());
        }
    }

    /// Stop and show the finished text in the finished colour
    pub fn stop(&mut self) {
        self.timer.clear();
        let finished_text = self.text(paths::FINISHED_TEXT);
        let finished = Palette::from_settings(&mut self.settings).finished;
        self.show(paths::DISPLAY_TIME, &finished_text);
        self.show(paths::DISPLAY_FOREGROUND, &finished);
        info!("Timer stopped");
    }

    /// Stop, then load the queued `next` configuration onto the display.
    /// The `next` group itself is left as is.
    pub fn next(&mut self) {
        self.stop();

        let (duration, warning) = (self.timer.duration, self.timer.warning);
        self.timer.duration = self.int_or(paths::NEXT_DURATION, duration);
        self.timer.warning = self.int_or(paths::NEXT_WARNING, warning);

        let palette = Palette::from_settings(&mut self.settings);
        let title = self.text(paths::NEXT_TITLE);
        let speaker = self.text(paths::NEXT_SPEAKER);
        self.show(paths::DISPLAY_FOREGROUND, &palette.primary);
        self.show(paths::DISPLAY_BACKGROUND, &palette.background);
        self.show(paths::DISPLAY_TITLE, &title);
        self.show(paths::DISPLAY_SPEAKER, &speaker);
        self.show(paths::DISPLAY_TIME, &format_remaining(self.timer.duration));
        info!(
            "Next speaker \"{}\": duration={}s, warning={}s",
            speaker, self.timer.duration, self.timer.warning
        );
    }

    /// Change the duration by a signed number of seconds; no clamping
    pub fn adjust(&mut self, delta_seconds: i64) {
        self.timer.duration = self.timer.duration.saturating_add(delta_seconds);
        info!(
            "Duration adjusted by {}s to {}s",
            delta_seconds, self.timer.duration
        );
    }

    pub fn add_minute(&mut self) {
        self.adjust(60);
    }

    pub fn subtract_minute(&mut self) {
        self.adjust(-60);
    }

    /// Evaluate elapsed time at `now` and update the display. Never fails.
    pub fn tick(&mut self, now: Instant) {
        let Some(remaining) = self.timer.remaining(now) else {
            return;
        };

        let palette = Palette::from_settings(&mut self.settings);
        match ColourState::for_remaining(remaining, self.timer.warning) {
            ColourState::Finished => {
                self.show(paths::DISPLAY_FOREGROUND, &palette.finished);
                let finished_text = self.text(paths::FINISHED_TEXT);
                self.show(paths::DISPLAY_TIME, &finished_text);
                self.timer.clear();
                info!("Timer finished");
            }
            state => {
                if self.show_if_changed(paths::DISPLAY_FOREGROUND, palette.colour_for(state)) {
                    debug!("Display colour now {:?}", state);
                }
                self.show_if_changed(paths::DISPLAY_TIME, &format_remaining(remaining));
            }
        }
    }

    fn text(&mut self, path: &str) -> String {
        self.settings.get_or(path, "").to_string()
    }

    fn int_or(&mut self, path: &str, fallback: i64) -> i64 {
        self.settings
            .get_or(path, fallback)
            .as_int()
            .unwrap_or(fallback)
    }

    fn show(&mut self, path: &str, value: &str) {
        if let Err(e) = self.settings.set(path, value) {
            warn!("Failed to update {}: {}", path, e);
        }
    }

    /// Write only if the leaf currently holds something else
    fn show_if_changed(&mut self, path: &str, value: &str) -> bool {
        if self.settings.get_or(path, "") == Value::from(value) {
            return false;
        }
        self.show(path, value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn engine() -> TimerEngine {
        TimerEngine::new(SettingsTree::new(None)).unwrap()
    }

    fn display(engine: &mut TimerEngine, path: &str) -> String {
        engine.settings_mut().get_str(path).unwrap()
    }

    fn record(engine: &mut TimerEngine, path: &str) -> Arc<Mutex<Vec<String>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        engine
            .settings_mut()
            .subscribe(path, move |v| sink.lock().unwrap().push(v.to_string()))
            .unwrap();
        seen
    }

    #[test]
    fn session_starts_from_initial_group() {
        let mut e = engine();
        assert_eq!(e.run_state(), RunState::Stopped);
        assert_eq!((e.duration(), e.warning()), (540, 60));
        assert_eq!(display(&mut e, paths::DISPLAY_TITLE), "My Webinar");
        assert_eq!(display(&mut e, paths::DISPLAY_SPEAKER), "Welcome");
        assert_eq!(display(&mut e, paths::DISPLAY_TIME), "");
        assert_eq!(display(&mut e, paths::DISPLAY_FOREGROUND), "green");
        assert_eq!(display(&mut e, paths::DISPLAY_BACKGROUND), "black");
    }

    #[test]
    fn tick_while_stopped_does_nothing() {
        let mut e = engine();
        let seen = record(&mut e, paths::DISPLAY_TIME);
        e.tick(Instant::now());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn first_tick_shows_full_duration() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        e.tick(t0);
        assert_eq!(e.remaining(t0), Some(540));
        assert_eq!(display(&mut e, paths::DISPLAY_TIME), "09:00");
        assert_eq!(display(&mut e, paths::DISPLAY_FOREGROUND), "green");
    }

    #[test]
    fn pause_freezes_the_display() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        e.pause(t0 + secs(30));
        e.tick(t0 + secs(40));
        let first = display(&mut e, paths::DISPLAY_TIME);
        e.tick(t0 + secs(400));
        assert_eq!(display(&mut e, paths::DISPLAY_TIME), first);
        assert_eq!(first, "08:30");
        assert_eq!(display(&mut e, paths::DISPLAY_FOREGROUND), "green");
    }

    #[test]
    fn resume_keeps_elapsed_time() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        e.pause(t0 + secs(30));
        e.start(t0 + secs(90));
        e.tick(t0 + secs(100));
        // 30s before the pause, 10s after
        assert_eq!(e.remaining(t0 + secs(100)), Some(500));
        assert_eq!(display(&mut e, paths::DISPLAY_TIME), "08:20");
    }

    #[test]
    fn warning_colour_at_threshold() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        e.tick(t0 + secs(479));
        assert_eq!(display(&mut e, paths::DISPLAY_FOREGROUND), "green");
        e.tick(t0 + secs(480));
        assert_eq!(display(&mut e, paths::DISPLAY_FOREGROUND), "orange");
        assert_eq!(display(&mut e, paths::DISPLAY_TIME), "01:00");
    }

    #[test]
    fn finishing_stops_the_timer() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        e.tick(t0 + secs(539));
        assert_eq!(display(&mut e, paths::DISPLAY_TIME), "00:01");
        assert_eq!(display(&mut e, paths::DISPLAY_FOREGROUND), "orange");

        e.tick(t0 + secs(540));
        assert_eq!(e.run_state(), RunState::Stopped);
        assert_eq!(display(&mut e, paths::DISPLAY_TIME), "STOP");
        assert_eq!(display(&mut e, paths::DISPLAY_FOREGROUND), "red");

        e.tick(t0 + secs(600));
        assert_eq!(display(&mut e, paths::DISPLAY_TIME), "STOP");
    }

    #[test]
    fn unchanged_values_are_not_rewritten() {
        let t0 = Instant::now();
        let mut e = engine();
        let colours = record(&mut e, paths::DISPLAY_FOREGROUND);
        let times = record(&mut e, paths::DISPLAY_TIME);
        e.start(t0);
        for tenth in 0..21 {
            e.tick(t0 + Duration::from_millis(tenth * 100));
        }
        assert!(colours.lock().unwrap().is_empty());
        assert_eq!(*times.lock().unwrap(), vec!["09:00", "08:59", "08:58"]);
    }

    #[test]
    fn stop_shows_finished_state() {
        let t0 = Instant::now();
        let mut e = engine();
        e.settings_mut().set(paths::FINISHED_TEXT, "TIME").unwrap();
        e.start(t0);
        e.tick(t0 + secs(5));
        e.stop();
        assert_eq!(e.run_state(), RunState::Stopped);
        assert_eq!(display(&mut e, paths::DISPLAY_TIME), "TIME");
        assert_eq!(display(&mut e, paths::DISPLAY_FOREGROUND), "red");
    }

    #[test]
    fn restart_after_stop_restores_running_colour() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        e.tick(t0);
        e.stop();
        e.start(t0 + secs(10));
        e.tick(t0 + secs(10));
        assert_eq!(display(&mut e, paths::DISPLAY_FOREGROUND), "green");
        assert_eq!(display(&mut e, paths::DISPLAY_TIME), "09:00");
    }

    #[test]
    fn next_loads_the_queued_speaker() {
        let t0 = Instant::now();
        let mut e = engine();
        {
            let s = e.settings_mut();
            s.set(paths::NEXT_DURATION, 125).unwrap();
            s.set(paths::NEXT_WARNING, 15).unwrap();
            s.set(paths::NEXT_SPEAKER, "Grace Hopper").unwrap();
            s.set(paths::NEXT_TITLE, "Compilers").unwrap();
        }
        e.start(t0);
        e.tick(t0 + secs(500));
        e.next();

        assert_eq!(e.run_state(), RunState::Stopped);
        assert_eq!((e.duration(), e.warning()), (125, 15));
        assert_eq!(display(&mut e, paths::DISPLAY_TITLE), "Compilers");
        assert_eq!(display(&mut e, paths::DISPLAY_SPEAKER), "Grace Hopper");
        assert_eq!(display(&mut e, paths::DISPLAY_TIME), "02:05");
        assert_eq!(display(&mut e, paths::DISPLAY_FOREGROUND), "green");
        assert_eq!(e.settings_mut().get_int(paths::NEXT_DURATION).unwrap(), 125);

        e.start(t0 + secs(600));
        e.tick(t0 + secs(711));
        assert_eq!(display(&mut e, paths::DISPLAY_FOREGROUND), "orange");
        assert_eq!(display(&mut e, paths::DISPLAY_TIME), "00:14");
    }

    #[test]
    fn adjust_is_unclamped() {
        let t0 = Instant::now();
        let mut e = engine();
        e.add_minute();
        assert_eq!(e.duration(), 600);
        e.adjust(-700);
        assert_eq!(e.duration(), -100);
        e.start(t0);
        e.tick(t0);
        assert_eq!(e.run_state(), RunState::Stopped);
        assert_eq!(display(&mut e, paths::DISPLAY_TIME), "STOP");
    }

    #[test]
    fn adjust_applies_on_next_tick() {
        let t0 = Instant::now();
        let mut e = engine();
        e.start(t0);
        e.tick(t0 + secs(10));
        e.subtract_minute();
        e.tick(t0 + secs(10));
        assert_eq!(display(&mut e, paths::DISPLAY_TIME), "07:50");
    }

    #[test]
    fn missing_settings_file_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsTree::new(Some(dir.path().join("absent.mt")));
        assert!(matches!(
            TimerEngine::new(settings),
            Err(SettingsError::FileNotFound(_))
        ));
    }
}

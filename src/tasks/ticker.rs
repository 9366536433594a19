//! Periodic tick driver for the timer engine

use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::state::AppState;

/// Background task that evaluates the timer at the configured cadence
pub async fn ticker_task(state: Arc<AppState>) {
    info!("Starting tick task every {:?}", state.tick_interval);

    let mut interval = interval(state.tick_interval);
    // Late ticks are dropped, not replayed
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        if let Err(e) = state.tick() {
            error!("Timer tick failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::{settings::SettingsTree, state::RunState};

    #[tokio::test]
    async fn ticker_counts_down_and_finishes() {
        let settings = SettingsTree::new(None);
        let state = Arc::new(
            AppState::new(settings, 0, "127.0.0.1".into(), Duration::from_millis(10)).unwrap(),
        );
        state.adjust(-539).unwrap();
        let mut display = state.subscribe_display();
        state.start().unwrap();
        assert_eq!(state.get_display_frame().time, "00:01");

        let task = tokio::spawn(ticker_task(Arc::clone(&state)));
        tokio::time::timeout(Duration::from_secs(5), async {
            while display.borrow_and_update().time != "STOP" {
                display.changed().await.unwrap();
            }
        })
        .await
        .unwrap();
        task.abort();

        assert_eq!(state.get_timer_snapshot().unwrap().run_state, RunState::Stopped);
        assert_eq!(state.get_display_frame().foreground, "red");
    }
}

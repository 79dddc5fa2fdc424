//! Countdown tick driver background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    scheduler::SessionId,
    state::{AppState, TickOutcome},
};

/// Background task that feeds scheduler wake-ups into the engine
pub async fn tick_driver_task(state: Arc<AppState>, mut tick_rx: mpsc::UnboundedReceiver<SessionId>) {
    info!("Starting tick driver task");

    while let Some(session) = tick_rx.recv().await {
        match state.tick(session) {
            Ok(TickOutcome::Running(remaining)) => {
                debug!("Countdown {} at {}ms", session, remaining.num_milliseconds());
            }
            Ok(TickOutcome::Expired) => {
                info!("Countdown {} finished", session);
            }
            Ok(TickOutcome::Ignored) => {
                debug!("Dropped wake-up from finished countdown {}", session);
            }
            Err(e) => {
                error!("Failed to deliver tick: {}", e);
            }
        }
    }

    info!("Tick channel closed, tick driver stopping");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::config::TimerSettings;

    #[tokio::test]
    async fn test_driver_expires_countdown() {
        let (state, tick_rx) = AppState::new(0, "127.0.0.1".to_string(), TimerSettings {
            update_rate: Duration::from_millis(20),
            seconds: Some(1),
            ..TimerSettings::default()
        });
        let state = Arc::new(state);
        let mut watcher = state.snapshot_tx.subscribe();

        tokio::spawn(tick_driver_task(Arc::clone(&state), tick_rx));
        state.start().unwrap();

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            watcher.wait_for(|snapshot| !snapshot.running),
        )
        .await
        .is_ok();

        assert!(finished);
        let engine = state.engine.lock().unwrap();
        assert!(!engine.is_running());
        assert_eq!(engine.scheduler().active_count(), 0);
    }
}

//! Snapshot logging background task

use std::sync::Arc;
use tracing::{debug, info};

use crate::state::AppState;

/// Background task that logs every published snapshot
pub async fn snapshot_log_task(state: Arc<AppState>) {
    info!("Starting snapshot log task");

    let mut snapshot_rx = state.snapshot_tx.subscribe();

    while snapshot_rx.changed().await.is_ok() {
        let snapshot = snapshot_rx.borrow_and_update().clone();
        match state.render(&snapshot) {
            Ok(view) => debug!(
                "Timer {} [interval {} x{}]",
                view.display,
                view.interval,
                view.repetitions
            ),
            Err(e) => debug!("Snapshot published but view unavailable: {}", e),
        }
    }
}

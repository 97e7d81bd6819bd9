//! Background eviction of expired share snapshots.

use crate::state::SharedState;
use log::info;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Sweeps expired shares every `every` until the task is aborted.
pub fn spawn_sweeper(state: SharedState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately.
        ticker.tick().await;
        info!(
            "event=share_sweeper module=server status=start interval_secs={}",
            every.as_secs()
        );
        loop {
            ticker.tick().await;
            state.shares.sweep_expired();
        }
    })
}

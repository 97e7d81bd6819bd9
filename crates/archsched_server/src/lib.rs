//! HTTP server exposing time-limited schedule shares.

pub mod http;
pub mod settings;
pub mod state;
pub mod sweep;

pub use settings::Settings;
pub use state::{AppState, SharedState};

use archsched_core::SystemClock;
use axum::Router;
use log::{info, warn};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Router with all endpoints bound to `state`.
pub fn build_router(state: SharedState) -> Router {
    http::routes().with_state(state)
}

/// Binds, serves until Ctrl-C, then stops the sweeper.
///
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let state = AppState::new(&settings.share, Arc::new(SystemClock)).shared();
    let sweeper = sweep::spawn_sweeper(state.clone(), settings.share.sweep_interval());

    let listener =
        TcpListener::bind((settings.server.host.as_str(), settings.server.port)).await?;
    info!(
        "event=server_start module=server status=ok addr={} public_base_url={}",
        listener.local_addr()?,
        settings.share.public_base_url
    );

    let served = axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;
    sweeper.abort();
    served?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=server_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}

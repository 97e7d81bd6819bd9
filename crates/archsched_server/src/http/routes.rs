use axum::{
    routing::{get, post},
    Router,
};

use crate::http::handlers::{create_share, get_share, health_check, missing_share_id};
use crate::state::SharedState;

/// Share endpoints plus `/health`.
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/schedule/share",
            post(create_share).get(missing_share_id),
        )
        .route("/api/schedule/share/", get(missing_share_id))
        .route("/api/schedule/share/{share_id}", get(get_share))
}

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::http::error::ApiError;
use crate::http::types::{
    CreateShareRequest, CreateShareResponse, HealthResponse, SharedScheduleResponse,
};
use crate::state::SharedState;
use archsched_core::ShareError;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /api/schedule/share
///
/// The body is decoded by hand so every malformed payload maps to 400,
/// whatever its content type.
pub async fn create_share(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<CreateShareResponse>, ApiError> {
    let request: CreateShareRequest =
        serde_json::from_slice(&body).map_err(|err| ApiError::InvalidPayload(err.to_string()))?;
    let link = state
        .shares
        .create_share(request.tasks, request.expiry_hours)?;
    Ok(Json(CreateShareResponse { url: link.url }))
}

/// GET /api/schedule/share/{share_id}
pub async fn get_share(
    State(state): State<SharedState>,
    Path(share_id): Path<String>,
) -> Result<Response, ApiError> {
    let snapshot = state.shares.get_share(&share_id)?;
    let body = SharedScheduleResponse {
        tasks: &snapshot.tasks,
        expires_at: snapshot.expires_at,
    };
    Ok(Json(body).into_response())
}

/// GET on the share collection without a token.
pub async fn missing_share_id() -> ApiError {
    ApiError::Share(ShareError::MissingToken)
}

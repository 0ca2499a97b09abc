use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use tracing::{error, instrument};

use crate::auth::AuthUser;
use crate::state::AppState;

use super::service::RecognizedFood;

pub fn routes() -> Router<AppState> {
    Router::new().route("/recognition/analyze", post(analyze_food))
}

/// POST /recognition/analyze — raw image bytes in, candidate food items out.
#[instrument(skip(state, headers, body))]
pub async fn analyze_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Vec<RecognizedFood>>, (StatusCode, String)> {
    if body.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "No image file uploaded".into()));
    }
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let candidates = state
        .recognizer
        .analyze(body, content_type)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "food recognition failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to analyze image: {e}"),
            )
        })?;

    Ok(Json(candidates))
}

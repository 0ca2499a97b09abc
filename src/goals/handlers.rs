use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::instrument;

use crate::auth::AuthUser;
use crate::dates;
use crate::state::AppState;

use super::dto::{SavedGoalResponse, UpsertGoalRequest};
use super::repo::{self, Goal, GoalValues};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(get_goal).post(upsert_goal))
        .route("/goals/history", get(get_history))
}

/// GET /goals — the user's most recent snapshot. The one strict endpoint:
/// an empty history is a 404 so clients can prompt goal setup.
#[instrument(skip(state))]
pub async fn get_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Goal>, (StatusCode, String)> {
    let goal = repo::latest(&state.db, user_id).await.map_err(internal)?;
    match goal {
        Some(goal) => Ok(Json(goal)),
        None => Err((
            StatusCode::NOT_FOUND,
            "No goal found for this user.".into(),
        )),
    }
}

/// GET /goals/history — every snapshot, as stored.
#[instrument(skip(state))]
pub async fn get_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Goal>>, (StatusCode, String)> {
    let history = repo::list_history(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(history))
}

/// POST /goals — upsert today's snapshot. Repeated writes on the same day
/// replace that day's values; a write on a new day starts a new snapshot.
#[instrument(skip(state, body))]
pub async fn upsert_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<UpsertGoalRequest>,
) -> Result<Json<SavedGoalResponse>, (StatusCode, String)> {
    let values = GoalValues {
        daily_calorie_target: body.daily_calorie_target,
        protein_target: body.protein_target,
        carb_target: body.carb_target,
        fat_target: body.fat_target,
        weight_goal: body.weight_goal,
    };
    let goal = repo::upsert(&state.db, user_id, dates::today_utc(), &values)
        .await
        .map_err(internal)?;
    Ok(Json(SavedGoalResponse {
        message: "Goal saved successfully!".into(),
        goal,
    }))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

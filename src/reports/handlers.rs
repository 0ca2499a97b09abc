use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use time::Duration;
use tracing::instrument;

use crate::auth::AuthUser;
use crate::dates;
use crate::goals;
use crate::state::AppState;

use super::dto::{MealTypeRow, TodayView, WeeklyRow};
use super::repo::fetch_intake;
use super::services::{
    compose_meal_types, compose_today, compose_weekly, sum_all, sum_by_day, sum_by_meal_type,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/today", get(today_report))
        .route("/reports/weekly", get(weekly_report))
        .route("/reports/meal-types", get(meal_type_report))
}

/// GET /reports/today — goal vs actual for the current UTC day. Never fails
/// merely because goals are unset.
#[instrument(skip(state))]
pub async fn today_report(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<TodayView>, (StatusCode, String)> {
    let today = dates::today_utc();
    let rows = fetch_intake(
        &state.db,
        user_id,
        Some(dates::start_of_day(today)),
        Some(dates::end_of_day(today)),
        None,
    )
    .await
    .map_err(internal)?;

    let history = goals::repo::list_history(&state.db, user_id)
        .await
        .map_err(internal)?;
    let active = goals::services::resolve_active(&history, today);

    Ok(Json(compose_today(sum_all(&rows), active)))
}

/// GET /reports/weekly — per-day totals over [today-7d, today], each day
/// carrying the goal that was active on that day.
#[instrument(skip(state))]
pub async fn weekly_report(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<WeeklyRow>>, (StatusCode, String)> {
    let today = dates::today_utc();
    let week_ago = today - Duration::days(7);
    let rows = fetch_intake(
        &state.db,
        user_id,
        Some(dates::start_of_day(week_ago)),
        Some(dates::end_of_day(today)),
        None,
    )
    .await
    .map_err(internal)?;

    let history = goals::repo::list_history(&state.db, user_id)
        .await
        .map_err(internal)?;

    Ok(Json(compose_weekly(sum_by_day(&rows), &history)))
}

/// GET /reports/meal-types — today's calories per meal type.
#[instrument(skip(state))]
pub async fn meal_type_report(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<MealTypeRow>>, (StatusCode, String)> {
    let today = dates::today_utc();
    let rows = fetch_intake(
        &state.db,
        user_id,
        Some(dates::start_of_day(today)),
        Some(dates::end_of_day(today)),
        None,
    )
    .await
    .map_err(internal)?;

    Ok(Json(compose_meal_types(sum_by_meal_type(&rows))))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

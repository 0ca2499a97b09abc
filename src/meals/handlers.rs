use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::auth::AuthUser;
use crate::dates;
use crate::state::AppState;

use super::dto::{
    AddMealRequest, AddMealResponse, FoodItemListQuery, FoodItemListResponse,
};
use super::repo::{self, Meal};
use super::services::{page_meta, page_offset};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(add_meal))
        .route("/food-items", get(list_food_items))
}

/// POST /meals — one logging event plus its food items, written as a batch.
#[instrument(skip(state, body))]
pub async fn add_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<AddMealRequest>,
) -> Result<(StatusCode, Json<AddMealResponse>), (StatusCode, String)> {
    let (meal, food_items) =
        repo::create_with_items(&state.db, user_id, body.meal_type, body.date, body.food_items)
            .await
            .map_err(internal)?;

    Ok((
        StatusCode::CREATED,
        Json(AddMealResponse {
            message: "Meal added successfully!".into(),
            meal,
            food_items,
        }),
    ))
}

/// GET /meals — all of the user's meals, newest intake date first.
#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Meal>>, (StatusCode, String)> {
    let meals = repo::list_by_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(meals))
}

/// GET /food-items — paginated listing with meal metadata, optionally
/// restricted to an inclusive date range.
#[instrument(skip(state))]
pub async fn list_food_items(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<FoodItemListQuery>,
) -> Result<Json<FoodItemListResponse>, (StatusCode, String)> {
    let (from, until) = dates::parse_range(q.start_date.as_deref(), q.end_date.as_deref())
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let total = repo::count_food_items(&state.db, user_id, from, until)
        .await
        .map_err(internal)?;

    let pagination = page_meta(total, q.page, q.limit);
    let food_items = repo::page_food_items(
        &state.db,
        user_id,
        from,
        until,
        pagination.limit,
        page_offset(pagination.page, pagination.limit),
    )
    .await
    .map_err(internal)?;

    Ok(Json(FoodItemListResponse {
        food_items,
        pagination,
    }))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

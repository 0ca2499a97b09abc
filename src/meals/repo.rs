use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::NewFoodItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "meal_type", rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

/// One logging event. `date` is the intake date, distinct from `created_at`;
/// immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_type: MealType,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// One consumed food entry, append-only, owned by a meal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub name: String,
    pub quantity: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub vitamins: Option<serde_json::Value>,
    pub minerals: Option<serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Food item joined with its owning meal's metadata, for the paginated
/// listing.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FoodItemWithMeal {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub name: String,
    pub quantity: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub vitamins: Option<serde_json::Value>,
    pub minerals: Option<serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub meal_date: OffsetDateTime,
    pub meal_type: MealType,
}

/// Creates the meal and its food items in one transaction. Missing macro
/// fields on an item land as 0.
pub async fn create_with_items(
    db: &PgPool,
    user_id: Uuid,
    meal_type: MealType,
    date: OffsetDateTime,
    items: Vec<NewFoodItem>,
) -> anyhow::Result<(Meal, Vec<FoodItem>)> {
    let mut tx = db.begin().await?;

    let meal = sqlx::query_as::<_, Meal>(
        r#"
        INSERT INTO meals (user_id, meal_type, date)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, meal_type, date, created_at
        "#,
    )
    .bind(user_id)
    .bind(meal_type)
    .bind(date)
    .fetch_one(&mut *tx)
    .await?;

    let mut saved = Vec::with_capacity(items.len());
    for item in items {
        let vitamins = item.vitamins.map(|m| serde_json::json!(m));
        let minerals = item.minerals.map(|m| serde_json::json!(m));
        let row = sqlx::query_as::<_, FoodItem>(
            r#"
            INSERT INTO food_items (meal_id, name, quantity, calories,
                                    protein, carbs, fat, vitamins, minerals)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, meal_id, name, quantity, calories, protein, carbs,
                      fat, vitamins, minerals, created_at
            "#,
        )
        .bind(meal.id)
        .bind(item.name)
        .bind(item.quantity)
        .bind(item.calories)
        .bind(item.protein)
        .bind(item.carbs)
        .bind(item.fat)
        .bind(vitamins)
        .bind(minerals)
        .fetch_one(&mut *tx)
        .await?;
        saved.push(row);
    }

    tx.commit().await?;
    Ok((meal, saved))
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
    let rows = sqlx::query_as::<_, Meal>(
        r#"
        SELECT id, user_id, meal_type, date, created_at
        FROM meals
        WHERE user_id = $1
        ORDER BY date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Number of food items matching the user/range filter, for pagination
/// metadata.
pub async fn count_food_items(
    db: &PgPool,
    user_id: Uuid,
    from: Option<OffsetDateTime>,
    until: Option<OffsetDateTime>,
) -> anyhow::Result<i64> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM food_items fi
        JOIN meals m ON m.id = fi.meal_id
        WHERE m.user_id = $1
          AND ($2::timestamptz IS NULL OR m.date >= $2)
          AND ($3::timestamptz IS NULL OR m.date <= $3)
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(until)
    .fetch_one(db)
    .await?;
    Ok(total)
}

/// One page of the user's food items, newest meal first, then newest item.
/// An out-of-range offset yields an empty slice, not an error.
pub async fn page_food_items(
    db: &PgPool,
    user_id: Uuid,
    from: Option<OffsetDateTime>,
    until: Option<OffsetDateTime>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<FoodItemWithMeal>> {
    let rows = sqlx::query_as::<_, FoodItemWithMeal>(
        r#"
        SELECT fi.id, fi.meal_id, fi.name, fi.quantity, fi.calories,
               fi.protein, fi.carbs, fi.fat, fi.vitamins, fi.minerals,
               fi.created_at, m.date AS meal_date, m.meal_type
        FROM food_items fi
        JOIN meals m ON m.id = fi.meal_id
        WHERE m.user_id = $1
          AND ($2::timestamptz IS NULL OR m.date >= $2)
          AND ($3::timestamptz IS NULL OR m.date <= $3)
        ORDER BY m.date DESC, fi.created_at DESC
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(until)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

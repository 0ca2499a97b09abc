use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::meals::repo::MealType;

/// One food item joined with its owning meal, flattened to what the
/// aggregation needs. The join is the only path from items to a user, so
/// user partitioning is structural.
#[derive(Debug, Clone, FromRow)]
pub struct IntakeRow {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub vitamins: Option<serde_json::Value>,
    pub minerals: Option<serde_json::Value>,
    pub meal_date: OffsetDateTime,
    pub meal_type: MealType,
}

/// Fetch step of the aggregator: join food_items to meals, restrict to the
/// user, apply the inclusive date range and optional meal-type filter.
/// Grouping and summing happen in memory (services).
pub async fn fetch_intake(
    db: &PgPool,
    user_id: Uuid,
    from: Option<OffsetDateTime>,
    until: Option<OffsetDateTime>,
    meal_type: Option<MealType>,
) -> anyhow::Result<Vec<IntakeRow>> {
    let rows = sqlx::query_as::<_, IntakeRow>(
        r#"
        SELECT fi.calories, fi.protein, fi.carbs, fi.fat,
               fi.vitamins, fi.minerals,
               m.date AS meal_date, m.meal_type
        FROM food_items fi
        JOIN meals m ON m.id = fi.meal_id
        WHERE m.user_id = $1
          AND ($2::timestamptz IS NULL OR m.date >= $2)
          AND ($3::timestamptz IS NULL OR m.date <= $3)
          AND ($4::meal_type IS NULL OR m.meal_type = $4)
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(until)
    .bind(meal_type)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

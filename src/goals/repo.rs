use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// One goal snapshot. At most one row exists per (user_id, date); the set of
/// a user's rows ordered by date is their goal history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "crate::dates::day_string")]
    pub date: Date,
    pub daily_calorie_target: f64,
    pub protein_target: Option<f64>,
    pub carb_target: Option<f64>,
    pub fat_target: Option<f64>,
    pub weight_goal: Option<f64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Target fields carried by a goal write. `user_id` and `date` are keys and
/// immutable once a snapshot exists.
#[derive(Debug, Clone)]
pub struct GoalValues {
    pub daily_calorie_target: f64,
    pub protein_target: Option<f64>,
    pub carb_target: Option<f64>,
    pub fat_target: Option<f64>,
    pub weight_goal: Option<f64>,
}

/// Single-statement conditional upsert: inserting a fresh snapshot and
/// replacing an existing day's values go through the same conflict target,
/// which is what makes repeated same-day writes idempotent and keeps
/// concurrent writes from interleaving into a mixed-field row.
const UPSERT_GOAL_SQL: &str = r#"
    INSERT INTO goals (user_id, date, daily_calorie_target, protein_target,
                       carb_target, fat_target, weight_goal)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    ON CONFLICT (user_id, date) DO UPDATE SET
        daily_calorie_target = EXCLUDED.daily_calorie_target,
        protein_target = EXCLUDED.protein_target,
        carb_target = EXCLUDED.carb_target,
        fat_target = EXCLUDED.fat_target,
        weight_goal = EXCLUDED.weight_goal,
        updated_at = now()
    RETURNING id, user_id, date, daily_calorie_target, protein_target,
              carb_target, fat_target, weight_goal, created_at, updated_at
"#;

/// Writes or replaces the snapshot for (user_id, on_date).
pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    on_date: Date,
    values: &GoalValues,
) -> anyhow::Result<Goal> {
    let goal = sqlx::query_as::<_, Goal>(UPSERT_GOAL_SQL)
        .bind(user_id)
        .bind(on_date)
        .bind(values.daily_calorie_target)
        .bind(values.protein_target)
        .bind(values.carb_target)
        .bind(values.fat_target)
        .bind(values.weight_goal)
        .fetch_one(db)
        .await?;
    Ok(goal)
}

/// All snapshots for the user, in insertion order. Callers sort by date
/// before resolving.
pub async fn list_history(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Goal>> {
    let rows = sqlx::query_as::<_, Goal>(
        r#"
        SELECT id, user_id, date, daily_calorie_target, protein_target,
               carb_target, fat_target, weight_goal, created_at, updated_at
        FROM goals
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Most recent snapshot by date, if any.
pub async fn latest(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Goal>> {
    let row = sqlx::query_as::<_, Goal>(
        r#"
        SELECT id, user_id, date, daily_calorie_target, protein_target,
               carb_target, fat_target, weight_goal, created_at, updated_at
        FROM goals
        WHERE user_id = $1
        ORDER BY date DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

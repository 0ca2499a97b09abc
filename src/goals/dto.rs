use serde::{Deserialize, Serialize};

use super::repo::Goal;

/// Body of POST /goals. `dailyCalorieTarget` is the one structurally
/// required field; the rest default to absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertGoalRequest {
    pub daily_calorie_target: f64,
    pub protein_target: Option<f64>,
    pub carb_target: Option<f64>,
    pub fat_target: Option<f64>,
    pub weight_goal: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SavedGoalResponse {
    pub message: String,
    pub goal: Goal,
}

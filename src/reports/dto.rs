use std::collections::BTreeMap;

use serde::Serialize;

use crate::meals::repo::MealType;

/// Goal-vs-actual comparison for the current day. `goal` is `{}` when the
/// user has no goal history; actuals are always present.
#[derive(Debug, Serialize)]
pub struct TodayView {
    pub goal: serde_json::Value,
    pub actual: ActualTotals,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActualTotals {
    pub consumed_calories: f64,
    pub consumed_protein: f64,
    pub consumed_carbs: f64,
    pub consumed_fat: f64,
    /// Micronutrient sums, keys already carrying the `consumed` prefix
    /// (e.g. `consumedIron`, `consumedVitaminA`).
    #[serde(flatten)]
    pub micros: BTreeMap<String, f64>,
}

/// One day of the weekly trend. `_id` is the `YYYY-MM-DD` grouping key;
/// `targetCalories` is the goal resolved independently for that day.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRow {
    #[serde(rename = "_id")]
    pub id: String,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    #[serde(flatten)]
    pub micros: BTreeMap<String, f64>,
    pub target_calories: f64,
}

/// Calories-only projection per meal type for the current day.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealTypeRow {
    #[serde(rename = "_id")]
    pub id: MealType,
    pub total_calories: f64,
}

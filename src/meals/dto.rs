use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::{FoodItem, FoodItemWithMeal, Meal, MealType};

/// Initial values for one food item. Matches the shape the recognition
/// collaborator emits, so its candidates can be posted back unchanged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFoodItem {
    pub name: String,
    pub quantity: String,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub vitamins: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub minerals: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMealRequest {
    pub meal_type: MealType,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(default)]
    pub food_items: Vec<NewFoodItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMealResponse {
    pub message: String,
    pub meal: Meal,
    pub food_items: Vec<FoodItem>,
}

/// Query string of GET /food-items.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItemListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}
fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItemListResponse {
    pub food_items: Vec<FoodItemWithMeal>,
    pub pagination: Pagination,
}

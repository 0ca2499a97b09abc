use std::collections::{BTreeMap, HashMap};

use crate::dates;
use crate::goals::repo::Goal;
use crate::goals::services::resolve_active;
use crate::meals::repo::MealType;

use super::dto::{ActualTotals, MealTypeRow, TodayView, WeeklyRow};
use super::repo::IntakeRow;

/// Summed nutrient values for one group. Micronutrient keys are normalized
/// to `vitaminA` / `iron` style regardless of the source map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NutrientTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub micros: BTreeMap<String, f64>,
}

impl NutrientTotals {
    fn add(&mut self, row: &IntakeRow) {
        self.calories += row.calories;
        self.protein += row.protein;
        self.carbs += row.carbs;
        self.fat += row.fat;
        fold_micros(&mut self.micros, "vitamin", row.vitamins.as_ref());
        fold_micros(&mut self.micros, "", row.minerals.as_ref());
    }
}

/// Adds the numeric entries of a jsonb map into the accumulator. Absent
/// maps and non-numeric values contribute nothing; summation never
/// null-propagates.
fn fold_micros(
    acc: &mut BTreeMap<String, f64>,
    family: &str,
    map: Option<&serde_json::Value>,
) {
    let Some(obj) = map.and_then(|v| v.as_object()) else {
        return;
    };
    for (key, value) in obj {
        let Some(n) = value.as_f64() else { continue };
        let key = if family.is_empty() {
            key.clone()
        } else {
            format!("{family}{}", capitalize(key))
        };
        *acc.entry(key).or_insert(0.0) += n;
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Micro map with per-view key prefixes, e.g. `consumedVitaminA`,
/// `totalIron`.
fn prefixed(prefix: &str, micros: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    micros
        .iter()
        .map(|(k, v)| (format!("{prefix}{}", capitalize(k)), *v))
        .collect()
}

/// `groupBy = none`: the whole filtered set as a single group. An empty set
/// yields all-zero totals, never an error or an empty result.
pub fn sum_all(rows: &[IntakeRow]) -> NutrientTotals {
    let mut totals = NutrientTotals::default();
    for row in rows {
        totals.add(row);
    }
    totals
}

/// `groupBy = day`: totals keyed by the meal date's own UTC calendar day,
/// ascending. Days without matching items produce no entry.
pub fn sum_by_day(rows: &[IntakeRow]) -> Vec<(String, NutrientTotals)> {
    let mut days: BTreeMap<String, NutrientTotals> = BTreeMap::new();
    for row in rows {
        days.entry(dates::day_key(row.meal_date))
            .or_default()
            .add(row);
    }
    days.into_iter().collect()
}

/// `groupBy = mealType`: totals per meal type, in enum order for stable
/// output (no order is mandated).
pub fn sum_by_meal_type(rows: &[IntakeRow]) -> Vec<(MealType, NutrientTotals)> {
    let mut groups: HashMap<MealType, NutrientTotals> = HashMap::new();
    for row in rows {
        groups.entry(row.meal_type).or_default().add(row);
    }
    [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snacks,
    ]
    .into_iter()
    .filter_map(|mt| groups.remove(&mt).map(|t| (mt, t)))
    .collect()
}

/// Merges today's totals with the resolved goal. A user with no history
/// still gets their actuals; a present-but-incomplete goal reports missing
/// targets as 0.
pub fn compose_today(totals: NutrientTotals, goal: Option<&Goal>) -> TodayView {
    let goal = match goal {
        Some(g) => serde_json::json!({
            "targetCalories": g.daily_calorie_target,
            "targetProtein": g.protein_target.unwrap_or(0.0),
            "targetCarbs": g.carb_target.unwrap_or(0.0),
            "targetFat": g.fat_target.unwrap_or(0.0),
        }),
        None => serde_json::json!({}),
    };
    TodayView {
        goal,
        actual: ActualTotals {
            consumed_calories: totals.calories,
            consumed_protein: totals.protein,
            consumed_carbs: totals.carbs,
            consumed_fat: totals.fat,
            micros: prefixed("consumed", &totals.micros),
        },
    }
}

/// Attaches the per-day calorie target to each emitted day group. The
/// target legitimately varies across the window when the goal history
/// changed inside it.
pub fn compose_weekly(days: Vec<(String, NutrientTotals)>, history: &[Goal]) -> Vec<WeeklyRow> {
    days.into_iter()
        .map(|(key, totals)| {
            let target = dates::parse_day(&key)
                .ok()
                .and_then(|day| resolve_active(history, day))
                .map(|g| g.daily_calorie_target)
                .unwrap_or(0.0);
            WeeklyRow {
                id: key,
                total_calories: totals.calories,
                total_protein: totals.protein,
                total_carbs: totals.carbs,
                total_fat: totals.fat,
                micros: prefixed("total", &totals.micros),
                target_calories: target,
            }
        })
        .collect()
}

pub fn compose_meal_types(groups: Vec<(MealType, NutrientTotals)>) -> Vec<MealTypeRow> {
    groups
        .into_iter()
        .map(|(meal_type, totals)| MealTypeRow {
            id: meal_type,
            total_calories: totals.calories,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::{Date, OffsetDateTime};
    use uuid::Uuid;

    fn row(calories: f64, at: OffsetDateTime, meal_type: MealType) -> IntakeRow {
        IntakeRow {
            calories,
            protein: calories / 20.0,
            carbs: calories / 10.0,
            fat: calories / 30.0,
            vitamins: None,
            minerals: None,
            meal_date: at,
            meal_type,
        }
    }

    fn goal_on(date: Date, kcal: f64) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date,
            daily_calorie_target: kcal,
            protein_target: Some(150.0),
            carb_target: None,
            fat_target: None,
            weight_goal: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn empty_set_sums_to_zero_totals() {
        let totals = sum_all(&[]);
        assert_eq!(totals, NutrientTotals::default());
    }

    #[test]
    fn reordering_rows_never_changes_totals() {
        let mut rows = vec![
            row(300.0, datetime!(2024-03-04 08:00 UTC), MealType::Breakfast),
            row(700.0, datetime!(2024-03-04 13:00 UTC), MealType::Lunch),
            row(450.0, datetime!(2024-03-05 19:00 UTC), MealType::Dinner),
        ];
        let forward = sum_all(&rows);
        rows.reverse();
        assert_eq!(sum_all(&rows), forward);
        assert_eq!(forward.calories, 1450.0);
    }

    #[test]
    fn micros_are_summed_and_namespaced() {
        let mut a = row(100.0, datetime!(2024-03-04 08:00 UTC), MealType::Breakfast);
        a.vitamins = Some(serde_json::json!({"a": 0.3, "c": 40.0}));
        a.minerals = Some(serde_json::json!({"iron": 2.0}));
        let mut b = row(200.0, datetime!(2024-03-04 13:00 UTC), MealType::Lunch);
        b.vitamins = Some(serde_json::json!({"c": 10.0}));
        b.minerals = Some(serde_json::json!({"iron": 1.5, "calcium": 120.0}));

        let totals = sum_all(&[a, b]);
        assert_eq!(totals.micros.get("vitaminA"), Some(&0.3));
        assert_eq!(totals.micros.get("vitaminC"), Some(&50.0));
        assert_eq!(totals.micros.get("iron"), Some(&3.5));
        assert_eq!(totals.micros.get("calcium"), Some(&120.0));
    }

    #[test]
    fn missing_micro_maps_contribute_nothing() {
        let mut with = row(100.0, datetime!(2024-03-04 08:00 UTC), MealType::Breakfast);
        with.minerals = Some(serde_json::json!({"iron": 2.0}));
        let without = row(50.0, datetime!(2024-03-04 09:00 UTC), MealType::Breakfast);

        let totals = sum_all(&[with, without]);
        assert_eq!(totals.micros.get("iron"), Some(&2.0));
        assert_eq!(totals.calories, 150.0);
    }

    #[test]
    fn day_groups_are_keyed_and_sorted_ascending() {
        let rows = vec![
            row(450.0, datetime!(2024-03-06 19:00 UTC), MealType::Dinner),
            row(300.0, datetime!(2024-03-04 08:00 UTC), MealType::Breakfast),
            row(700.0, datetime!(2024-03-04 13:00 UTC), MealType::Lunch),
        ];
        let days = sum_by_day(&rows);
        let keys: Vec<&str> = days.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["2024-03-04", "2024-03-06"]);
        assert_eq!(days[0].1.calories, 1000.0);
        assert_eq!(days[1].1.calories, 450.0);
    }

    #[test]
    fn meal_type_groups_sum_calories() {
        let rows = vec![
            row(300.0, datetime!(2024-03-04 08:00 UTC), MealType::Breakfast),
            row(150.0, datetime!(2024-03-04 10:30 UTC), MealType::Snacks),
            row(200.0, datetime!(2024-03-04 09:00 UTC), MealType::Breakfast),
        ];
        let trend = compose_meal_types(sum_by_meal_type(&rows));
        assert_eq!(
            trend,
            vec![
                MealTypeRow {
                    id: MealType::Breakfast,
                    total_calories: 500.0
                },
                MealTypeRow {
                    id: MealType::Snacks,
                    total_calories: 150.0
                },
            ]
        );
    }

    #[test]
    fn today_view_pairs_goal_with_actuals() {
        // breakfast 300 + lunch 700 on day D, goal 2000 set on D-3
        let rows = vec![
            row(300.0, datetime!(2024-03-08 08:00 UTC), MealType::Breakfast),
            row(700.0, datetime!(2024-03-08 13:00 UTC), MealType::Lunch),
        ];
        let history = vec![goal_on(time::macros::date!(2024 - 03 - 05), 2000.0)];
        let active = resolve_active(&history, time::macros::date!(2024 - 03 - 08));

        let view = compose_today(sum_all(&rows), active);
        assert_eq!(view.goal["targetCalories"], 2000.0);
        assert_eq!(view.goal["targetProtein"], 150.0);
        assert_eq!(view.goal["targetCarbs"], 0.0);
        assert_eq!(view.actual.consumed_calories, 1000.0);
    }

    #[test]
    fn today_view_without_history_keeps_actuals() {
        let rows = vec![row(
            300.0,
            datetime!(2024-03-08 08:00 UTC),
            MealType::Breakfast,
        )];
        let view = compose_today(sum_all(&rows), None);
        assert_eq!(view.goal, serde_json::json!({}));
        assert_eq!(view.actual.consumed_calories, 300.0);
    }

    #[test]
    fn weekly_targets_follow_goal_changes_inside_the_window() {
        // goal changed 1800 -> 2200 on day D-2 (2024-03-08, with D0 = 03-10)
        let history = vec![
            goal_on(time::macros::date!(2024 - 03 - 01), 1800.0),
            goal_on(time::macros::date!(2024 - 03 - 08), 2200.0),
        ];
        let rows = vec![
            row(500.0, datetime!(2024-03-04 12:00 UTC), MealType::Lunch),
            row(600.0, datetime!(2024-03-07 12:00 UTC), MealType::Lunch),
            row(650.0, datetime!(2024-03-08 12:00 UTC), MealType::Lunch),
            row(700.0, datetime!(2024-03-10 12:00 UTC), MealType::Lunch),
        ];

        let weekly = compose_weekly(sum_by_day(&rows), &history);
        let targets: Vec<(&str, f64)> = weekly
            .iter()
            .map(|r| (r.id.as_str(), r.target_calories))
            .collect();
        assert_eq!(
            targets,
            vec![
                ("2024-03-04", 1800.0),
                ("2024-03-07", 1800.0),
                ("2024-03-08", 2200.0),
                ("2024-03-10", 2200.0),
            ]
        );
    }

    #[test]
    fn weekly_emits_no_rows_for_days_without_intake() {
        let history = vec![goal_on(time::macros::date!(2024 - 03 - 01), 1800.0)];
        let weekly = compose_weekly(sum_by_day(&[]), &history);
        assert!(weekly.is_empty());
    }
}

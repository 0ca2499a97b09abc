use time::Date;

use super::repo::Goal;

/// Picks the goal snapshot that was active on `on_date`: the snapshot with
/// the greatest date at or before the query date. A query exactly on a
/// snapshot's own date resolves to that snapshot. A query that predates the
/// user's earliest snapshot falls back to the earliest one, so historical
/// days never lose their target merely because the user set goals late.
/// Empty history resolves to `None`; callers zero-default the targets.
pub fn resolve_active(history: &[Goal], on_date: Date) -> Option<&Goal> {
    let mut sorted: Vec<&Goal> = history.iter().collect();
    sorted.sort_by_key(|g| g.date);
    sorted
        .iter()
        .rev()
        .find(|g| g.date <= on_date)
        .copied()
        .or_else(|| sorted.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn snapshot(on: Date, kcal: f64) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: on,
            daily_calorie_target: kcal,
            protein_target: None,
            carb_target: None,
            fat_target: None,
            weight_goal: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn picks_greatest_snapshot_at_or_before_query() {
        let history = vec![
            snapshot(date!(2024 - 01 - 01), 1800.0),
            snapshot(date!(2024 - 01 - 10), 2000.0),
            snapshot(date!(2024 - 01 - 20), 2200.0),
        ];
        let active = resolve_active(&history, date!(2024 - 01 - 15)).unwrap();
        assert_eq!(active.daily_calorie_target, 2000.0);
    }

    #[test]
    fn query_on_snapshot_date_resolves_to_that_snapshot() {
        let history = vec![
            snapshot(date!(2024 - 01 - 01), 1800.0),
            snapshot(date!(2024 - 01 - 10), 2200.0),
        ];
        let active = resolve_active(&history, date!(2024 - 01 - 10)).unwrap();
        assert_eq!(active.daily_calorie_target, 2200.0);
    }

    #[test]
    fn query_before_earliest_falls_back_to_earliest() {
        let history = vec![
            snapshot(date!(2024 - 01 - 10), 1800.0),
            snapshot(date!(2024 - 01 - 20), 2200.0),
        ];
        let active = resolve_active(&history, date!(2023 - 12 - 25)).unwrap();
        assert_eq!(active.daily_calorie_target, 1800.0);
    }

    #[test]
    fn empty_history_resolves_to_none() {
        assert!(resolve_active(&[], date!(2024 - 01 - 01)).is_none());
    }

    #[test]
    fn stored_order_does_not_matter() {
        // the ledger does not guarantee stored order
        let history = vec![
            snapshot(date!(2024 - 01 - 20), 2200.0),
            snapshot(date!(2024 - 01 - 01), 1800.0),
            snapshot(date!(2024 - 01 - 10), 2000.0),
        ];
        let active = resolve_active(&history, date!(2024 - 01 - 12)).unwrap();
        assert_eq!(active.daily_calorie_target, 2000.0);
    }
}

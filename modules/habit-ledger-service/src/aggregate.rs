//! Pure read-side transforms over one owner's full record set.

use habit_ledger_types::{Habit, Suggestion, TrendPoint};
use std::collections::HashMap;

/// Most recent distinct dates retained by the trend series.
const TREND_WINDOW: usize = 30;

/// Completed-record count per day, most recent day first.
///
/// Days with no completed records produce no entry. ISO dates sort
/// chronologically under plain string comparison, so the descending
/// sort is a string sort.
pub fn trend_series(records: &[Habit]) -> Vec<TrendPoint> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for habit in records {
        if habit.completed {
            *counts.entry(habit.date.as_str()).or_insert(0) += 1;
        }
    }

    let mut points: Vec<TrendPoint> = counts
        .into_iter()
        .map(|(date, count)| TrendPoint {
            date: date.to_string(),
            count,
        })
        .collect();
    points.sort_by(|a, b| b.date.cmp(&a.date));
    points.truncate(TREND_WINDOW);
    points
}

/// Deduplicated name/note catalog, name ascending.
///
/// Records are keyed by trimmed lowercase name; the first-created record
/// for a key supplies the retained casing and note ("first write wins").
/// The input must be in creation order, which `Db::get_by_owner`
/// guarantees.
pub fn suggestion_catalog(records: &[Habit]) -> Vec<Suggestion> {
    let mut by_key: HashMap<String, Suggestion> = HashMap::new();
    for habit in records {
        let key = habit.name.trim().to_lowercase();
        by_key.entry(key).or_insert_with(|| Suggestion {
            name: habit.name.clone(),
            note: habit.note.clone(),
        });
    }

    let mut catalog: Vec<Suggestion> = by_key.into_values().collect();
    catalog.sort_by(|a, b| a.name.cmp(&b.name));
    catalog
}

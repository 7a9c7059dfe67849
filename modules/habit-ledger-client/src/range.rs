//! Windowed multi-date aggregation: fan out one lookup per date, wait
//! for all of them, merge into a single calendar view.

use chrono::{Duration, NaiveDate};
use futures_util::future::join_all;
use habit_ledger_types::Habit;
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;

/// Merged result of a windowed fetch.
#[derive(Debug, Default)]
pub struct RangeView {
    /// Every requested date, mapped to its (possibly empty) record list.
    pub by_date: BTreeMap<String, Vec<Habit>>,
    /// The subset of dates with at least one record; drives calendar
    /// highlighting.
    pub dates_with_data: BTreeSet<String>,
}

/// All days of one calendar month as ISO dates. An invalid month yields
/// an empty window.
pub fn month_dates(year: i32, month: u32) -> Vec<String> {
    let mut dates = Vec::new();
    let mut day = 1;
    while let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
        dates.push(date.format("%Y-%m-%d").to_string());
        day += 1;
    }
    dates
}

/// The trailing `days` calendar days ending at `today`, oldest first.
pub fn trailing_dates(today: NaiveDate, days: i64) -> Vec<String> {
    (0..days)
        .rev()
        .map(|back| (today - Duration::days(back)).format("%Y-%m-%d").to_string())
        .collect()
}

/// Issue one lookup per date, dispatched concurrently, and merge once
/// all of them settle.
///
/// A failed lookup counts as zero records for that date. It never aborts
/// the window, never affects another date's result, and never surfaces
/// an error to the caller. There is no short-circuit and no cancellation.
pub async fn merge_range<F, Fut, E>(dates: Vec<String>, lookup: F) -> RangeView
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Vec<Habit>, E>>,
{
    let calls = dates.into_iter().map(|date| {
        let fut = lookup(date.clone());
        async move { (date, fut.await) }
    });

    let mut view = RangeView::default();
    for (date, result) in join_all(calls).await {
        let habits = result.unwrap_or_default();
        if !habits.is_empty() {
            view.dates_with_data.insert(date.clone());
        }
        view.by_date.insert(date, habits);
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habit(date: &str) -> Habit {
        Habit {
            id: format!("id-{date}"),
            owner: "admin".to_string(),
            date: date.to_string(),
            name: "Run".to_string(),
            note: None,
            completed: true,
            created_at: format!("{date}T08:00:00+00:00"),
        }
    }

    #[test]
    fn month_windows_have_the_right_day_counts() {
        assert_eq!(month_dates(2024, 1).len(), 31);
        assert_eq!(month_dates(2024, 2).len(), 29);
        assert_eq!(month_dates(2023, 2).len(), 28);
        assert_eq!(month_dates(2024, 4).len(), 30);
        assert_eq!(month_dates(2024, 1)[0], "2024-01-01");
        assert_eq!(month_dates(2024, 1)[30], "2024-01-31");
        assert!(month_dates(2024, 13).is_empty());
    }

    #[test]
    fn trailing_window_ends_today_oldest_first() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let dates = trailing_dates(today, 365);
        assert_eq!(dates.len(), 365);
        assert_eq!(dates.last().unwrap(), "2024-03-01");
        // 2024 is a leap year, so 364 days back from March 1 lands on
        // March 3 of the previous year.
        assert_eq!(dates[0], "2023-03-03");
        assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[tokio::test]
    async fn merges_all_dates_and_tracks_which_have_data() {
        let dates = vec![
            "2024-01-01".to_string(),
            "2024-01-02".to_string(),
            "2024-01-03".to_string(),
        ];
        let view = merge_range(dates, |date| async move {
            if date == "2024-01-02" {
                Ok::<_, String>(vec![])
            } else {
                Ok(vec![habit(&date)])
            }
        })
        .await;

        assert_eq!(view.by_date.len(), 3);
        assert!(view.by_date["2024-01-02"].is_empty());
        assert_eq!(view.by_date["2024-01-01"].len(), 1);
        assert_eq!(
            view.dates_with_data.iter().collect::<Vec<_>>(),
            vec!["2024-01-01", "2024-01-03"]
        );
    }

    #[tokio::test]
    async fn a_failed_date_degrades_to_empty_without_erroring() {
        let dates = vec![
            "2024-01-01".to_string(),
            "2024-01-02".to_string(),
            "2024-01-03".to_string(),
        ];
        let view = merge_range(dates, |date| async move {
            if date == "2024-01-02" {
                Err("store unreachable")
            } else {
                Ok(vec![habit(&date)])
            }
        })
        .await;

        // The failed date is present, just empty; its neighbors are
        // untouched.
        assert_eq!(view.by_date.len(), 3);
        assert!(view.by_date["2024-01-02"].is_empty());
        assert_eq!(view.by_date["2024-01-01"].len(), 1);
        assert_eq!(view.by_date["2024-01-03"].len(), 1);
        assert!(!view.dates_with_data.contains("2024-01-02"));
    }

    #[tokio::test]
    async fn empty_window_merges_to_empty_view() {
        let view = merge_range(vec![], |_date| async move { Ok::<_, String>(vec![]) }).await;
        assert!(view.by_date.is_empty());
        assert!(view.dates_with_data.is_empty());
    }
}

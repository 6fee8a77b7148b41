use crate::errors::AppResult;
use crate::ledger::days_between;
use crate::models::{AppData, Day, SummaryRow};
use crate::schedule::{is_possible_on, month_window, week_window};
use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

/// One report row: links recorded on the day against habits possible that day.
pub fn summarize_day(data: &AppData, day: &Day) -> SummaryRow {
    let amount = data
        .habits
        .iter()
        .filter(|habit| habit.user_id == day.user_id && is_possible_on(habit, day.date))
        .count();

    SummaryRow {
        id: day.id,
        date: day.date,
        user_id: day.user_id,
        completed: day.completed.len() as f64,
        amount: amount as f64,
    }
}

/// Rows for every Day of `user_id` in the calendar month containing `date`.
pub fn user_month_summary(data: &AppData, user_id: Uuid, date: NaiveDate) -> Vec<SummaryRow> {
    let (start, end) = month_window(date);
    days_between(data, user_id, start, end)
        .into_iter()
        .map(|day| summarize_day(data, day))
        .collect()
}

/// Rows for every Day `user_id` has ever had, oldest first.
pub fn user_summary(data: &AppData, user_id: Uuid) -> Vec<SummaryRow> {
    days_between(data, user_id, NaiveDate::MIN, NaiveDate::MAX)
        .into_iter()
        .map(|day| summarize_day(data, day))
        .collect()
}

/// Completed habit ids for each existing Day of the Sunday-based week holding
/// `date`, in date order. Days without a row are skipped, not padded.
pub fn week_completed(
    data: &AppData,
    date: NaiveDate,
    user_id: Uuid,
) -> AppResult<Vec<Vec<Uuid>>> {
    let (start, end) = week_window(date)?;
    Ok(days_between(data, user_id, start, end)
        .into_iter()
        .map(|day| day.completed.iter().copied().collect())
        .collect())
}

/// Zero-based month of `date`, the way clients index months.
pub fn month_index(date: NaiveDate) -> u32 {
    date.month0()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::habits::{create_habit_at, delete_habit_at, toggle_at, update_habit};
    use crate::ledger::ensure_day;
    use crate::schedule::week_day;
    use chrono::Duration;

    const EVERY_DAY: [i64; 7] = [0, 1, 2, 3, 4, 5, 6];

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_summary_counts_links_and_possible() {
        let mut data = AppData::default();
        let user = Uuid::new_v4();
        let start = date(2024, 1, 1);
        let run = create_habit_at(&mut data, user, "Run", &[1, 3], start)
            .unwrap()
            .id;
        let read = create_habit_at(&mut data, user, "Read", &EVERY_DAY, start)
            .unwrap()
            .id;

        toggle_at(&mut data, run, user, start, false).unwrap();
        toggle_at(&mut data, read, user, start, false).unwrap();
        toggle_at(&mut data, read, user, date(2024, 1, 2), false).unwrap();
        ensure_day(&mut data, user, date(2024, 2, 1));

        let rows = user_month_summary(&data, user, date(2024, 1, 20));
        assert_eq!(rows.len(), 2);
        let row = |i: usize| (rows[i].date, rows[i].completed, rows[i].amount);
        assert_eq!(row(0), (start, 2.0, 2.0));
        assert_eq!(row(1), (date(2024, 1, 2), 1.0, 1.0));
    }

    #[test]
    fn month_summary_never_completes_more_than_possible() {
        let mut data = AppData::default();
        let user = Uuid::new_v4();
        let start = date(2024, 3, 1);
        let every_day = create_habit_at(&mut data, user, "Water", &EVERY_DAY, start)
            .unwrap()
            .id;
        let weekdays = create_habit_at(&mut data, user, "Work", &[1, 2, 3, 4, 5], start)
            .unwrap()
            .id;

        for offset in 0..19 {
            let day = start + Duration::days(offset);
            toggle_at(&mut data, every_day, user, day, false).unwrap();
            if matches!(week_day(day), 1..=5) {
                toggle_at(&mut data, weekdays, user, day, false).unwrap();
            }
        }
        delete_habit_at(&mut data, weekdays, user, date(2024, 3, 20)).unwrap();
        ensure_day(&mut data, user, date(2024, 3, 25));

        let rows = user_month_summary(&data, user, start);
        assert_eq!(rows.len(), 21);
        for row in rows {
            assert!(row.completed <= row.amount, "{row:?}");
            let linked = data.days.iter().find(|day| day.id == row.id).unwrap().completed.len();
            assert_eq!(row.completed, linked as f64);
        }
    }

    #[test]
    fn rescheduling_keeps_completions_the_new_days_no_longer_count() {
        let mut data = AppData::default();
        let user = Uuid::new_v4();
        let monday = date(2024, 1, 1);
        let run = create_habit_at(&mut data, user, "Run", &[1], monday)
            .unwrap()
            .id;
        toggle_at(&mut data, run, user, monday, false).unwrap();
        update_habit(&mut data, run, user, "Run", &[2, 4]).unwrap();

        let rows = user_month_summary(&data, user, monday);
        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].completed, rows[0].amount), (1.0, 0.0));
    }

    #[test]
    fn habits_created_later_are_not_counted_earlier() {
        let mut data = AppData::default();
        let user = Uuid::new_v4();
        create_habit_at(&mut data, user, "Run", &[1], date(2024, 1, 1)).unwrap();
        create_habit_at(&mut data, user, "Swim", &[1], date(2024, 1, 8)).unwrap();

        let rows = user_summary(&data, user);
        let amounts: Vec<f64> = rows.iter().map(|row| row.amount).collect();
        assert_eq!(amounts, vec![1.0, 2.0]);
    }

    #[test]
    fn week_completed_skips_missing_days_in_date_order() {
        let mut data = AppData::default();
        let user = Uuid::new_v4();
        let habit = create_habit_at(&mut data, user, "Read", &EVERY_DAY, date(2024, 1, 1))
            .unwrap()
            .id;
        toggle_at(&mut data, habit, user, date(2024, 1, 3), false).unwrap();
        ensure_day(&mut data, user, date(2023, 12, 31));
        ensure_day(&mut data, user, date(2024, 1, 7));

        let week = week_completed(&data, date(2024, 1, 4), user).unwrap();
        assert_eq!(week, vec![vec![], vec![], vec![habit]]);
    }

    #[test]
    fn week_completed_at_calendar_edges_is_a_validation_error() {
        let data = AppData::default();
        let user = Uuid::new_v4();
        for edge in [NaiveDate::MAX, NaiveDate::MIN] {
            let err = week_completed(&data, edge, user).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{edge}");
        }
    }

    #[test]
    fn month_index_is_zero_based() {
        assert_eq!(month_index(date(2024, 1, 31)), 0);
        assert_eq!(month_index(date(2024, 12, 1)), 11);
    }
}

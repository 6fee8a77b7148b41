use crate::errors::{AppError, AppResult};
use crate::ledger::find_day;
use crate::models::{AppData, Habit, PossibleHabit};
use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDate};
use uuid::Uuid;

/// Weekday number used everywhere: 0 = Sunday .. 6 = Saturday.
pub fn week_day(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Whether `habit` could have been completed on `date`: it existed, was not yet
/// soft-deleted, and is scheduled for that weekday. Both the per-day listing
/// and the summary counts go through here.
pub fn is_possible_on(habit: &Habit, date: NaiveDate) -> bool {
    habit.created_at <= date
        && habit.deleted_at.is_none_or(|deleted| deleted > date)
        && habit.week_days.contains(&week_day(date))
}

pub fn find_possible_habits(
    data: &AppData,
    date: NaiveDate,
    user_id: Uuid,
) -> Vec<PossibleHabit> {
    data.habits
        .iter()
        .filter(|habit| habit.user_id == user_id && is_possible_on(habit, date))
        .map(|habit| PossibleHabit {
            id: habit.id,
            title: habit.title.clone(),
            created_at: habit.created_at,
        })
        .collect()
}

/// Never creates a Day; a date without one has nothing completed.
pub fn find_completed_habits(data: &AppData, date: NaiveDate, user_id: Uuid) -> Vec<Uuid> {
    find_day(data, user_id, date)
        .map(|day| day.completed.iter().copied().collect())
        .unwrap_or_default()
}

/// Sunday through Saturday containing `date`. Fails for the partial weeks at
/// the ends of the supported calendar.
pub fn week_window(date: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
    let start = date.checked_sub_days(Days::new(u64::from(week_day(date))));
    let end = start.and_then(|start| start.checked_add_days(Days::new(6)));
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(AppError::validation(format!("date out of range: {date}"))),
    }
}

pub fn month_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date.with_day0(0).unwrap_or(date);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (start, end)
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; timestamps are truncated to
/// the local calendar date.
pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|stamp| stamp.with_timezone(&Local).date_naive())
        .map_err(|_| AppError::validation(format!("invalid date: {raw}")))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ensure_day;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit(user_id: Uuid, created: NaiveDate, days: &[u8]) -> Habit {
        Habit {
            id: Uuid::new_v4(),
            user_id,
            title: "Run".into(),
            created_at: created,
            deleted_at: None,
            week_days: days.iter().copied().collect(),
        }
    }

    #[test]
    fn week_day_counts_from_sunday() {
        assert_eq!(week_day(date(2024, 1, 7)), 0);
        assert_eq!(week_day(date(2024, 1, 1)), 1);
        assert_eq!(week_day(date(2024, 1, 6)), 6);
    }

    #[test]
    fn possible_only_on_scheduled_weekdays_after_creation() {
        let user = Uuid::new_v4();
        let mut data = AppData::default();
        data.habits.push(habit(user, date(2024, 1, 1), &[1, 3]));

        for offset in -3..28 {
            let day = date(2024, 1, 1) + Duration::days(offset);
            let found = !find_possible_habits(&data, day, user).is_empty();
            let expected = offset >= 0 && matches!(week_day(day), 1 | 3);
            assert_eq!(found, expected, "{day}");
        }
    }

    #[test]
    fn deleted_habit_stays_possible_before_deletion_date() {
        let user = Uuid::new_v4();
        let mut data = AppData::default();
        let mut h = habit(user, date(2024, 1, 1), &[0, 1, 2, 3, 4, 5, 6]);
        h.deleted_at = Some(date(2024, 2, 1));
        data.habits.push(h);

        assert_eq!(find_possible_habits(&data, date(2024, 1, 15), user).len(), 1);
        assert_eq!(find_possible_habits(&data, date(2024, 1, 31), user).len(), 1);
        assert!(find_possible_habits(&data, date(2024, 2, 1), user).is_empty());
        assert!(find_possible_habits(&data, date(2024, 2, 15), user).is_empty());
    }

    #[test]
    fn possible_habits_are_scoped_to_user() {
        let mut data = AppData::default();
        data.habits.push(habit(Uuid::new_v4(), date(2024, 1, 1), &[1]));
        assert!(find_possible_habits(&data, date(2024, 1, 1), Uuid::new_v4()).is_empty());
    }

    #[test]
    fn completed_without_day_is_empty_and_creates_nothing() {
        let data = AppData::default();
        assert!(find_completed_habits(&data, date(2024, 1, 1), Uuid::new_v4()).is_empty());
        assert!(data.days.is_empty());
    }

    #[test]
    fn completed_reads_day_links() {
        let user = Uuid::new_v4();
        let habit_id = Uuid::new_v4();
        let mut data = AppData::default();
        ensure_day(&mut data, user, date(2024, 1, 1)).completed.insert(habit_id);
        let completed = find_completed_habits(&data, date(2024, 1, 1), user);
        assert_eq!(completed, vec![habit_id]);
        assert!(find_completed_habits(&data, date(2024, 1, 2), user).is_empty());
    }

    #[test]
    fn windows_cover_week_and_month() {
        let week = week_window(date(2024, 1, 3)).unwrap();
        assert_eq!(week, (date(2023, 12, 31), date(2024, 1, 6)));
        let week = week_window(date(2024, 1, 7)).unwrap();
        assert_eq!(week, (date(2024, 1, 7), date(2024, 1, 13)));
        let month = month_window(date(2024, 2, 14));
        assert_eq!(month, (date(2024, 2, 1), date(2024, 2, 29)));
        let month = month_window(date(2023, 12, 31));
        assert_eq!(month, (date(2023, 12, 1), date(2023, 12, 31)));
    }

    #[test]
    fn week_window_at_calendar_edges_is_rejected() {
        for raw in [NaiveDate::MAX.to_string(), NaiveDate::MIN.to_string()] {
            let edge = parse_date(&raw).unwrap();
            assert!(matches!(week_window(edge), Err(AppError::Validation(_))), "{raw}");
        }
        let (_, end) = month_window(NaiveDate::MAX);
        assert_eq!(end, NaiveDate::MAX);
    }

    #[test]
    fn parse_date_accepts_plain_dates_and_rejects_garbage() {
        assert_eq!(parse_date("2024-01-15").unwrap(), date(2024, 1, 15));
        assert!(parse_date("2024-01-15T12:00:00Z").is_ok());
        assert!(matches!(parse_date("15/01/2024"), Err(AppError::Validation(_))));
    }
}

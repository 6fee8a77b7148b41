//! Lookups over the habit and day tables shared by the engines.

use crate::errors::{AppError, AppResult};
use crate::models::{AppData, Day, Habit};
use chrono::NaiveDate;
use uuid::Uuid;

pub fn find_day(data: &AppData, user_id: Uuid, date: NaiveDate) -> Option<&Day> {
    data.days
        .iter()
        .find(|day| day.user_id == user_id && day.date == date)
}

/// Fetch-or-create the Day row for `(user_id, date)`. There is never more than
/// one row per pair.
pub fn ensure_day(data: &mut AppData, user_id: Uuid, date: NaiveDate) -> &mut Day {
    let index = match data
        .days
        .iter()
        .position(|day| day.user_id == user_id && day.date == date)
    {
        Some(index) => index,
        None => {
            data.days.push(Day {
                id: Uuid::new_v4(),
                user_id,
                date,
                completed: Default::default(),
            });
            data.days.len() - 1
        }
    };
    &mut data.days[index]
}

/// Days of `user_id` with `start <= date <= end`, ordered by date.
pub fn days_between(data: &AppData, user_id: Uuid, start: NaiveDate, end: NaiveDate) -> Vec<&Day> {
    let mut days: Vec<&Day> = data
        .days
        .iter()
        .filter(|day| day.user_id == user_id && day.date >= start && day.date <= end)
        .collect();
    days.sort_by_key(|day| day.date);
    days
}

/// A habit belonging to `user_id`. Habits of other users are reported as missing.
pub fn owned_habit(data: &AppData, habit_id: Uuid, user_id: Uuid) -> AppResult<&Habit> {
    data.habits
        .iter()
        .find(|habit| habit.id == habit_id && habit.user_id == user_id)
        .ok_or_else(|| AppError::not_found("habit"))
}

pub fn owned_habit_mut(data: &mut AppData, habit_id: Uuid, user_id: Uuid) -> AppResult<&mut Habit> {
    data.habits
        .iter_mut()
        .find(|habit| habit.id == habit_id && habit.user_id == user_id)
        .ok_or_else(|| AppError::not_found("habit"))
}

use crate::errors::{AppError, AppResult};
use crate::ledger::{ensure_day, find_day, owned_habit, owned_habit_mut};
use crate::models::{AppData, Habit, HabitInfo};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Completed,
    Uncompleted,
    Unchanged,
}

pub fn validate_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("title must not be empty"));
    }
    Ok(title.to_string())
}

pub fn parse_week_days(week_days: &[i64]) -> AppResult<BTreeSet<u8>> {
    let mut set = BTreeSet::new();
    for &day in week_days {
        let day = u8::try_from(day)
            .ok()
            .filter(|day| *day <= 6)
            .ok_or_else(|| AppError::validation(format!("week day out of range: {day}")))?;
        set.insert(day);
    }
    if set.is_empty() {
        return Err(AppError::validation("at least one week day is required"));
    }
    Ok(set)
}

/// Creates the habit dated `today` and makes sure today's Day row exists.
pub fn create_habit_at(
    data: &mut AppData,
    user_id: Uuid,
    title: &str,
    week_days: &[i64],
    today: NaiveDate,
) -> AppResult<HabitInfo> {
    let habit = Habit {
        id: Uuid::new_v4(),
        user_id,
        title: validate_title(title)?,
        created_at: today,
        deleted_at: None,
        week_days: parse_week_days(week_days)?,
    };
    let created = HabitInfo::from(&habit);
    data.habits.push(habit);
    ensure_day(data, user_id, today);

    info!(habit_id = %created.id, user_id = %user_id, "habit created");
    Ok(created)
}

/// Replaces the title and the whole weekday set. Completion history is kept.
pub fn update_habit(
    data: &mut AppData,
    habit_id: Uuid,
    user_id: Uuid,
    title: &str,
    week_days: &[i64],
) -> AppResult<HabitInfo> {
    let title = validate_title(title)?;
    let week_days = parse_week_days(week_days)?;
    let habit = owned_habit_mut(data, habit_id, user_id)?;
    if habit.deleted_at.is_some() {
        return Err(AppError::not_found("habit"));
    }
    habit.title = title;
    habit.week_days = week_days;

    info!(habit_id = %habit_id, "habit updated");
    Ok(HabitInfo::from(&*habit))
}

/// Flips the habit's completion for `today`, creating the Day row on demand.
///
/// The flip does not consult the weekday schedule. With `on_delete` an existing
/// completion is still removed, but a missing one is never created. A
/// soft-deleted habit can only be toggled as part of its own deletion.
pub fn toggle_at(
    data: &mut AppData,
    habit_id: Uuid,
    user_id: Uuid,
    today: NaiveDate,
    on_delete: bool,
) -> AppResult<ToggleOutcome> {
    if owned_habit(data, habit_id, user_id)?.deleted_at.is_some() && !on_delete {
        return Err(AppError::not_found("habit"));
    }
    let linked = find_day(data, user_id, today)
        .is_some_and(|day| day.completed.contains(&habit_id));

    let day = ensure_day(data, user_id, today);
    let outcome = if linked {
        day.completed.remove(&habit_id);
        ToggleOutcome::Uncompleted
    } else if on_delete {
        ToggleOutcome::Unchanged
    } else {
        day.completed.insert(habit_id);
        ToggleOutcome::Completed
    };

    info!(habit_id = %habit_id, user_id = %user_id, ?outcome, "habit toggled");
    Ok(outcome)
}

/// Clears today's completion and soft-deletes the habit from `today` on.
pub fn delete_habit_at(
    data: &mut AppData,
    habit_id: Uuid,
    user_id: Uuid,
    today: NaiveDate,
) -> AppResult<()> {
    if owned_habit(data, habit_id, user_id)?.deleted_at.is_some() {
        return Err(AppError::not_found("habit"));
    }
    toggle_at(data, habit_id, user_id, today, true)?;
    owned_habit_mut(data, habit_id, user_id)?.deleted_at = Some(today);

    info!(habit_id = %habit_id, deleted_at = %today, "habit deleted");
    Ok(())
}

pub fn habit_info(data: &AppData, habit_id: Uuid, user_id: Uuid) -> AppResult<HabitInfo> {
    owned_habit(data, habit_id, user_id).map(HabitInfo::from)
}

/// Active habits of `user_id`, ordered by title.
pub fn list_user_habits(data: &AppData, user_id: Uuid) -> Vec<HabitInfo> {
    let mut habits: Vec<HabitInfo> = data
        .habits
        .iter()
        .filter(|habit| habit.user_id == user_id && habit.deleted_at.is_none())
        .map(HabitInfo::from)
        .collect();
    habits.sort_by(|a, b| a.title.cmp(&b.title));
    habits
}

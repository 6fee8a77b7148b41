use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Everything the service persists. Written to disk as a single JSON document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub follows: BTreeSet<Follow>,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub days: Vec<Day>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub avatar: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `follower_id` follows `followee_id`. Both directions are read from this one set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Follow {
    pub follower_id: Uuid,
    pub followee_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: NaiveDate,
    pub deleted_at: Option<NaiveDate>,
    /// 0 = Sunday .. 6 = Saturday.
    pub week_days: BTreeSet<u8>,
}

/// Ledger entry for one user on one calendar date. A habit id in `completed`
/// means the habit was done that day; absence means it was not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: BTreeSet<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PossibleHabit {
    pub id: Uuid,
    pub title: String,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryRow {
    pub id: Uuid,
    pub date: NaiveDate,
    pub user_id: Uuid,
    pub completed: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitInfo {
    pub id: Uuid,
    pub title: String,
    pub created_at: NaiveDate,
    pub deleted_at: Option<NaiveDate>,
    #[serde(rename = "weekDays")]
    pub week_days: Vec<u8>,
}

impl From<&Habit> for HabitInfo {
    fn from(habit: &Habit) -> Self {
        Self {
            id: habit.id,
            title: habit.title.clone(),
            created_at: habit.created_at,
            deleted_at: habit.deleted_at,
            week_days: habit.week_days.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HabitRequest {
    pub title: String,
    #[serde(rename = "weekDays")]
    pub week_days: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FollowSummaryQuery {
    pub username: String,
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummaryResponse {
    pub possible_habits: Vec<PossibleHabit>,
    pub completed_habits: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummaryResponse {
    pub completed_habits: Vec<Vec<Uuid>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummaryResponse {
    /// Zero-based, January = 0.
    pub month: u32,
    pub month_summary: Vec<SummaryRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: Vec<SummaryRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitsResponse {
    pub habits: Vec<HabitInfo>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    #[serde(default)]
    pub avatar: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub avatar: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenLoginRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    pub password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub authenticated: bool,
    pub id: Uuid,
    pub first_name: String,
    pub email: String,
    pub token: String,
}

/// Profile as shown to other users. Contact details are only filled in for
/// the owner's own view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub followers: Vec<String>,
    pub following: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FollowInfo {
    pub followers: Vec<String>,
    pub following: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserProfile>,
}

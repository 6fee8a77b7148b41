use crate::auth::{hash_password, issue_token, verify_password, verify_token, AuthUser};
use crate::errors::{AppError, AppResult};
use crate::habits;
use crate::models::{
    AuthResponse, DateQuery, DaySummaryResponse, FollowInfo, FollowSummaryQuery, HabitInfo,
    HabitRequest, HabitsResponse, LoginRequest, MonthSummaryResponse, PasswordChangeRequest,
    RegisterRequest, SummaryResponse, TokenLoginRequest, UpdateProfileRequest, User, UserProfile,
    UsersResponse, WeekSummaryResponse,
};
use crate::schedule::{find_completed_habits, find_possible_habits, parse_date, today};
use crate::state::AppState;
use crate::summary::{month_index, user_month_summary, user_summary, week_completed};
use crate::users;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::validation(format!("invalid id: {raw}")))
}

fn required_date(query: &DateQuery) -> AppResult<NaiveDate> {
    query
        .date
        .as_deref()
        .ok_or_else(|| AppError::validation("date is required"))
        .and_then(parse_date)
}

fn optional_date(raw: Option<&str>) -> AppResult<NaiveDate> {
    raw.map_or_else(|| Ok(today()), parse_date)
}

fn auth_response(user: &User, state: &AppState) -> AppResult<AuthResponse> {
    Ok(AuthResponse {
        authenticated: true,
        id: user.id,
        first_name: user.first_name.clone(),
        email: user.email.clone(),
        token: issue_token(user.id, &user.email, &state.jwt)?,
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    if payload.password.is_empty() {
        return Err(AppError::validation("password must not be empty"));
    }
    let password_hash = hash_password(&payload.password)?;
    let profile = state
        .store
        .write(|data| {
            let user = users::register(data, &payload, password_hash, Utc::now())?;
            Ok(users::profile(data, &user, true))
        })
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = state
        .store
        .read(|data| {
            users::find_by_email(data, &payload.email)
                .cloned()
                .ok_or_else(|| AppError::not_found("user"))
        })
        .await?;
    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("invalid password".into()));
    }
    Ok(Json(auth_response(&user, &state)?))
}

pub async fn login_with_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenLoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let claims = verify_token(&payload.token, &state.jwt)?;
    let user = state
        .store
        .read(|data| {
            users::find_by_id(data, claims.sub)
                .cloned()
                .map_err(|_| AppError::Unauthorized("invalid or expired token".into()))
        })
        .await?;
    Ok(Json(auth_response(&user, &state)?))
}

pub async fn user_info(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<UserProfile>> {
    let profile = state
        .store
        .read(|data| {
            let user = users::find_by_id(data, auth.user_id)?;
            Ok(users::profile(data, user, true))
        })
        .await?;
    Ok(Json(profile))
}

pub async fn public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserProfile>> {
    let profile = state
        .store
        .read(|data| {
            let user = users::find_by_username(data, &username)
                .ok_or_else(|| AppError::not_found("user"))?;
            Ok(users::profile(data, user, false))
        })
        .await?;
    Ok(Json(profile))
}

pub async fn follow_info(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<FollowInfo>> {
    let info = state
        .store
        .read(|data| Ok(users::follow_info(data, auth.user_id)))
        .await?;
    Ok(Json(info))
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    let profile = state
        .store
        .write(|data| {
            let user = users::update_profile(data, auth.user_id, &payload, Utc::now())?;
            Ok(users::profile(data, &user, true))
        })
        .await?;
    Ok(Json(profile))
}

pub async fn update_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PasswordChangeRequest>,
) -> AppResult<StatusCode> {
    if payload.new_password.is_empty() {
        return Err(AppError::validation("newPassword must not be empty"));
    }
    let current_hash = state
        .store
        .read(|data| {
            users::find_by_id(data, auth.user_id).map(|user| user.password_hash.clone())
        })
        .await?;
    if !verify_password(&payload.password, &current_hash)? {
        return Err(AppError::Unauthorized("incorrect password".into()));
    }
    let new_hash = hash_password(&payload.new_password)?;
    state
        .store
        .write(|data| users::set_password_hash(data, auth.user_id, new_hash))
        .await?;
    Ok(StatusCode::OK)
}

pub async fn search_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<UsersResponse>> {
    let users = state.store.read(|data| Ok(users::search(data))).await?;
    Ok(Json(UsersResponse { users }))
}

pub async fn follow_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    state
        .store
        .write(|data| users::toggle_follow(data, auth.user_id, &username))
        .await?;
    Ok(StatusCode::OK)
}

pub async fn create_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<HabitRequest>,
) -> AppResult<(StatusCode, Json<HabitInfo>)> {
    let today = today();
    let habit = state
        .store
        .write(|data| {
            habits::create_habit_at(
                data,
                auth.user_id,
                &payload.title,
                &payload.week_days,
                today,
            )
        })
        .await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn habit_info(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<HabitInfo>> {
    let id = parse_id(&id)?;
    let habit = state
        .store
        .read(|data| habits::habit_info(data, id, auth.user_id))
        .await?;
    Ok(Json(habit))
}

pub async fn list_habits(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<HabitsResponse>> {
    let habits = state
        .store
        .read(|data| Ok(habits::list_user_habits(data, auth.user_id)))
        .await?;
    Ok(Json(HabitsResponse { habits }))
}

pub async fn update_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<HabitRequest>,
) -> AppResult<Json<HabitInfo>> {
    let id = parse_id(&id)?;
    let habit = state
        .store
        .write(|data| {
            habits::update_habit(data, id, auth.user_id, &payload.title, &payload.week_days)
        })
        .await?;
    Ok(Json(habit))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    let today = today();
    state
        .store
        .write(|data| habits::delete_habit_at(data, id, auth.user_id, today))
        .await?;
    Ok(StatusCode::OK)
}

pub async fn toggle_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    let today = today();
    state
        .store
        .write(|data| habits::toggle_at(data, id, auth.user_id, today, false))
        .await?;
    Ok(StatusCode::OK)
}

pub async fn day_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<DaySummaryResponse>> {
    let date = required_date(&query)?;
    let summary = state
        .store
        .read(|data| {
            Ok(DaySummaryResponse {
                possible_habits: find_possible_habits(data, date, auth.user_id),
                completed_habits: find_completed_habits(data, date, auth.user_id),
            })
        })
        .await?;
    Ok(Json(summary))
}

pub async fn week_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<WeekSummaryResponse>> {
    let date = required_date(&query)?;
    let completed_habits = state
        .store
        .read(|data| week_completed(data, date, auth.user_id))
        .await?;
    Ok(Json(WeekSummaryResponse { completed_habits }))
}

pub async fn month_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<MonthSummaryResponse>> {
    let date = optional_date(query.date.as_deref())?;
    let month_summary = state
        .store
        .read(|data| Ok(user_month_summary(data, auth.user_id, date)))
        .await?;
    Ok(Json(MonthSummaryResponse {
        month: month_index(date),
        month_summary,
    }))
}

/// Month summary of another user, looked up by username.
pub async fn follow_summary(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<FollowSummaryQuery>,
) -> AppResult<Json<MonthSummaryResponse>> {
    let date = optional_date(query.date.as_deref())?;
    let month_summary = state
        .store
        .read(|data| {
            let user = users::find_by_username(data, &query.username)
                .ok_or_else(|| AppError::not_found("user"))?;
            Ok(user_month_summary(data, user.id, date))
        })
        .await?;
    Ok(Json(MonthSummaryResponse {
        month: month_index(date),
        month_summary,
    }))
}

pub async fn all_summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<SummaryResponse>> {
    let summary = state
        .store
        .read(|data| Ok(user_summary(data, auth.user_id)))
        .await?;
    Ok(Json(SummaryResponse { summary }))
}

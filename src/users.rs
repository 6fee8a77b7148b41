use crate::errors::{AppError, AppResult};
use crate::models::{
    AppData, Follow, FollowInfo, RegisterRequest, UpdateProfileRequest, User, UserProfile,
};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

pub fn find_by_id(data: &AppData, id: Uuid) -> AppResult<&User> {
    data.users
        .iter()
        .find(|user| user.id == id)
        .ok_or_else(|| AppError::not_found("user"))
}

pub fn find_by_email<'a>(data: &'a AppData, email: &str) -> Option<&'a User> {
    let email = email.trim().to_lowercase();
    data.users.iter().find(|user| user.email == email)
}

pub fn find_by_username<'a>(data: &'a AppData, username: &str) -> Option<&'a User> {
    data.users.iter().find(|user| user.username == username)
}

fn required(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

/// Adds a user. `password_hash` is already hashed by the caller.
pub fn register(
    data: &mut AppData,
    request: &RegisterRequest,
    password_hash: String,
    now: DateTime<Utc>,
) -> AppResult<User> {
    let username = required(&request.username, "username")?;
    let email = required(&request.email, "email")?.to_lowercase();
    if find_by_email(data, &email).is_some() {
        return Err(AppError::Conflict("email already registered".into()));
    }
    if find_by_username(data, &username).is_some() {
        return Err(AppError::Conflict("username unavailable".into()));
    }

    let user = User {
        id: Uuid::new_v4(),
        username,
        first_name: required(&request.first_name, "first_name")?,
        last_name: request.last_name.trim().to_string(),
        email,
        phone: request.phone.trim().to_string(),
        avatar: request.avatar.clone(),
        password_hash,
        created_at: now,
        updated_at: now,
    };
    data.users.push(user.clone());

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

pub fn update_profile(
    data: &mut AppData,
    user_id: Uuid,
    request: &UpdateProfileRequest,
    now: DateTime<Utc>,
) -> AppResult<User> {
    let username = required(&request.username, "username")?;
    let email = required(&request.email, "email")?.to_lowercase();
    let first_name = required(&request.first_name, "firstName")?;
    if find_by_email(data, &email).is_some_and(|other| other.id != user_id) {
        return Err(AppError::Conflict("email already in use".into()));
    }
    if find_by_username(data, &username).is_some_and(|other| other.id != user_id) {
        return Err(AppError::Conflict("username unavailable".into()));
    }

    let user = data
        .users
        .iter_mut()
        .find(|user| user.id == user_id)
        .ok_or_else(|| AppError::not_found("user"))?;
    user.username = username;
    user.email = email;
    user.first_name = first_name;
    user.last_name = request.last_name.trim().to_string();
    user.phone = request.phone.trim().to_string();
    user.avatar = request.avatar.clone();
    user.updated_at = now;
    Ok(user.clone())
}

pub fn set_password_hash(
    data: &mut AppData,
    user_id: Uuid,
    password_hash: String,
) -> AppResult<()> {
    let user = data
        .users
        .iter_mut()
        .find(|user| user.id == user_id)
        .ok_or_else(|| AppError::not_found("user"))?;
    user.password_hash = password_hash;
    user.updated_at = Utc::now();
    Ok(())
}

/// Follows `username` if not yet followed, otherwise unfollows. Returns whether
/// the caller follows them afterwards.
pub fn toggle_follow(data: &mut AppData, follower_id: Uuid, username: &str) -> AppResult<bool> {
    let follower = find_by_id(data, follower_id)?;
    if follower.username == username {
        return Err(AppError::validation("you cannot follow yourself"));
    }
    let followee_id = find_by_username(data, username)
        .map(|user| user.id)
        .ok_or_else(|| AppError::not_found("user"))?;

    let link = Follow {
        follower_id,
        followee_id,
    };
    let following = if data.follows.remove(&link) {
        false
    } else {
        data.follows.insert(link);
        true
    };

    info!(follower_id = %follower_id, followee = %username, following, "follow toggled");
    Ok(following)
}

fn usernames(data: &AppData, ids: impl Iterator<Item = Uuid>) -> Vec<String> {
    let mut names: Vec<String> = ids
        .filter_map(|id| find_by_id(data, id).ok())
        .map(|user| user.username.clone())
        .collect();
    names.sort();
    names
}

pub fn follow_info(data: &AppData, user_id: Uuid) -> FollowInfo {
    FollowInfo {
        followers: usernames(
            data,
            data.follows
                .iter()
                .filter(|link| link.followee_id == user_id)
                .map(|link| link.follower_id),
        ),
        following: usernames(
            data,
            data.follows
                .iter()
                .filter(|link| link.follower_id == user_id)
                .map(|link| link.followee_id),
        ),
    }
}

/// `with_contact` adds email and phone, for the owner's own view.
pub fn profile(data: &AppData, user: &User, with_contact: bool) -> UserProfile {
    let FollowInfo {
        followers,
        following,
    } = follow_info(data, user.id);
    UserProfile {
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: with_contact.then(|| user.email.clone()),
        phone: with_contact.then(|| user.phone.clone()),
        avatar: user.avatar.clone(),
        created_at: user.created_at,
        followers,
        following,
    }
}

/// Public profiles of every user, ordered by first name.
pub fn search(data: &AppData) -> Vec<UserProfile> {
    let mut users: Vec<&User> = data.users.iter().collect();
    users.sort_by(|a, b| a.first_name.cmp(&b.first_name));
    users.into_iter().map(|user| profile(data, user, false)).collect()
}

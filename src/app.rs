use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/loginWithToken", post(handlers::login_with_token))
        .route("/userinfo", get(handlers::user_info))
        .route("/followinfo", get(handlers::follow_info))
        .route("/users/current", put(handlers::update_profile))
        .route("/users/current/password", put(handlers::update_password))
        .route("/users/search", get(handlers::search_users))
        .route("/users/habits", get(handlers::list_habits))
        .route("/users/habits/:id/update", put(handlers::update_habit))
        .route("/users/:username/userinfo", get(handlers::public_profile))
        .route("/users/:username/follow", patch(handlers::follow_user))
        .route("/habits", post(handlers::create_habit))
        .route("/habit/:id", get(handlers::habit_info))
        .route("/habits/:id/toggle", patch(handlers::toggle_habit))
        .route("/habits/:id/delete", delete(handlers::delete_habit))
        .route("/day", get(handlers::day_summary))
        .route("/weekSummary", get(handlers::week_summary))
        .route("/monthSummary", get(handlers::month_summary))
        .route("/summary", get(handlers::follow_summary))
        .route("/allSummary", get(handlers::all_summary))
        .with_state(state)
}

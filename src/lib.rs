pub mod app;
pub mod auth;
pub mod config;
pub mod errors;
pub mod habits;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod schedule;
pub mod state;
pub mod storage;
pub mod summary;
pub mod users;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::load_data;

use crate::config::{AppConfig, JwtConfig};
use crate::models::AppData;
use crate::storage::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub jwt: JwtConfig,
}

impl AppState {
    pub fn new(config: &AppConfig, data: AppData) -> Self {
        Self {
            store: Store::new(config.data_path.clone(), data),
            jwt: config.jwt.clone(),
        }
    }
}

use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 3333;
const DEFAULT_DATA_PATH: &str = "data/state.json";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set and non-empty")]
    MissingSecret,
    #[error("{name} is not valid: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

impl AppConfig {
    /// Reads `PORT`, `APP_DATA_PATH`, `JWT_SECRET` and `JWT_TTL_HOURS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_var("PORT", DEFAULT_PORT)?;
        let data_path = env::var("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH));

        let secret = env::var("JWT_SECRET").unwrap_or_default();
        if secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        let ttl_hours = check_ttl_hours(parse_var("JWT_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?)?;

        Ok(Self {
            port,
            data_path,
            jwt: JwtConfig { secret, ttl_hours },
        })
    }
}

/// Token lifetime must be between one hour and one year.
fn check_ttl_hours(hours: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(ConfigError::Invalid {
            name: "JWT_TTL_HOURS",
            value: hours.to_string(),
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

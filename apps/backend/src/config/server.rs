//! Process configuration read from the environment.

use std::path::PathBuf;

use crate::AppError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Extra `*.json` decks loaded next to the built-in one.
    pub decks_dir: Option<PathBuf>,
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// `WIZZ_HOST`, `WIZZ_PORT`, `WIZZ_JWT_SECRET` (required), `WIZZ_DECKS_DIR`,
    /// `CORS_ALLOWED_ORIGINS` (comma separated).
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = non_empty("WIZZ_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match non_empty("WIZZ_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::config(format!("WIZZ_PORT is not a valid port: {raw}")))?,
            None => DEFAULT_PORT,
        };
        let jwt_secret =
            non_empty("WIZZ_JWT_SECRET").ok_or_else(|| AppError::config("WIZZ_JWT_SECRET must be set"))?;
        let decks_dir = non_empty("WIZZ_DECKS_DIR").map(PathBuf::from);
        let cors_origins = non_empty("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            jwt_secret,
            decks_dir,
            cors_origins,
        })
    }
}

/// Keep only plausible http(s) origins; drops blanks and `null`.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

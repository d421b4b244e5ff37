use std::time::{Duration, SystemTime};

use wizz_backend::auth::jwt::mint_access_token;
use wizz_backend::state::security_config::SecurityConfig;

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_purposes_only";

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(TEST_JWT_SECRET.as_bytes())
}

/// Mint a valid access token for `user_id`.
pub fn mint_test_token(user_id: i64, username: &str, security: &SecurityConfig) -> String {
    mint_access_token(user_id, username, SystemTime::now(), security)
        .expect("should mint token successfully")
}

/// Mint a token whose expiry lies well in the past.
pub fn mint_expired_token(user_id: i64, username: &str, security: &SecurityConfig) -> String {
    let issued = SystemTime::now() - Duration::from_secs(2 * 24 * 60 * 60);
    mint_access_token(user_id, username, issued, security).expect("should mint token successfully")
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

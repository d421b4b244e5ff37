use jsonwebtoken::Algorithm;

/// JWT verification settings.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Vec<u8>,
    /// Pinned algorithm; tokens signed otherwise are rejected.
    pub algorithm: Algorithm,
    /// Lifetime of tokens minted by `mint_access_token`.
    pub token_ttl_secs: i64,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl_secs: 12 * 60 * 60,
        }
    }
}

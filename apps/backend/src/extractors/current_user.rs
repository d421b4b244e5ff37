use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::verify_access_token;
use crate::domain::UserId;
use crate::error::AppError;
use crate::services::Caller;
use crate::state::app_state::AppState;

/// Authenticated user, resolved from `Authorization: Bearer <jwt>` or, for
/// websocket upgrades where browsers cannot set headers, `?token=<jwt>`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
}

impl From<CurrentUser> for Caller {
    fn from(user: CurrentUser) -> Self {
        Caller {
            id: user.id,
            username: user.username,
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req))
    }
}

fn resolve(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not configured"))?;

    let token = bearer_token(req)
        .or_else(|| query_token(req))
        .ok_or_else(AppError::unauthorized_missing_bearer)?;
    let claims = verify_access_token(&token, &state.security)?;

    Ok(CurrentUser {
        id: claims.sub,
        username: claims.username,
    })
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token.to_string()),
        _ => None,
    }
}

fn query_token(req: &HttpRequest) -> Option<String> {
    #[derive(Deserialize)]
    struct TokenQuery {
        token: Option<String>,
    }

    web::Query::<TokenQuery>::from_query(req.query_string())
        .ok()?
        .into_inner()
        .token
        .filter(|t| !t.is_empty())
}

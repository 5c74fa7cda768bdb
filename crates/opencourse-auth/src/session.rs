//! Authenticated-session extractor.

use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use crate::cookie::SESSION_TOKEN;
use crate::token::{AuthError, validate_session_token};

/// Provides the HMAC secret used to validate session tokens.
/// Implemented by the service `AppState`.
pub trait JwtSecret {
    fn jwt_secret(&self) -> &str;
}

/// User identity extracted from the `token` cookie or an
/// `Authorization: Bearer` header, validated against the JWT secret.
///
/// Missing, invalid, and expired tokens are rejected with distinct kinds so
/// the client can route to login versus re-verification.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    /// Role as `u8` wire value; see `opencourse_domain::user::UserRole`.
    pub user_role: u8,
    pub token_exp: u64,
}

/// Rejection for [`Session`]: all variants map to 401 with a distinct kind.
#[derive(Debug, thiserror::Error)]
pub enum SessionRejection {
    #[error("missing token")]
    Missing,
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
}

impl SessionRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Missing => "MISSING_TOKEN",
            Self::Invalid => "INVALID_TOKEN",
            Self::Expired => "EXPIRED_TOKEN",
        }
    }
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

fn token_from_parts(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(SESSION_TOKEN) {
        return Some(cookie.value().to_owned());
    }
    parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::to_owned)
}

impl<S> FromRequestParts<S> for Session
where
    S: JwtSecret + Send + Sync,
{
    type Rejection = SessionRejection;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = token_from_parts(parts)
            .ok_or(SessionRejection::Missing)
            .and_then(|token| {
                validate_session_token(&token, state.jwt_secret()).map_err(|e| match e {
                    AuthError::Expired => SessionRejection::Expired,
                    AuthError::InvalidSignature | AuthError::Malformed => SessionRejection::Invalid,
                })
            })
            .map(|info| Session {
                user_id: info.user_id,
                user_role: info.user_role,
                token_exp: info.token_exp,
            });

        async move { result }
    }
}

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use opencourse_auth::cookie::{clear_session_cookie, set_session_cookie};
use opencourse_auth::session::Session;
use opencourse_domain::user::UserRole;

use crate::domain::types::User;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::account::{
    RegisterInput, RegisterUseCase, ResendOtpInput, ResendOtpUseCase, VerifyEmailInput,
    VerifyEmailUseCase,
};
use crate::usecase::password::{
    ResetPasswordInput, ResetPasswordUseCase, SendResetOtpInput, SendResetOtpUseCase,
};
use crate::usecase::session::{CurrentUserUseCase, LoginInput, LoginUseCase};

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: &'static str,
    pub is_verified: bool,
    #[serde(serialize_with = "opencourse_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "opencourse_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl UserResponse {
    pub fn from_user(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            role: UserRole::from_u8(user.role)
                .map(|r| r.as_name())
                .unwrap_or("student"),
            is_verified: user.is_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    /// Session expiry as unix seconds.
    pub token_exp: u64,
}

// ── POST /api/auth/register ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub admin_key: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub user_id: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        mailer: state.mailer.clone(),
        admin_key: state.admin_key.clone(),
    };
    let user_id = usecase
        .execute(RegisterInput {
            name: body.name,
            email: body.email,
            password: body.password,
            admin_key: body.admin_key,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user_id.to_string(),
        }),
    ))
}

// ── POST /api/auth/verify-email ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyEmailRequest {
    /// The id returned by registration.
    pub user_id: Uuid,
    pub otp: String,
}

pub async fn verify_email(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<VerifyEmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = VerifyEmailUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let (user, token, exp) = usecase
        .execute(VerifyEmailInput {
            user_id: body.user_id,
            otp: body.otp,
        })
        .await?;

    let jar = set_session_cookie(jar, token, state.secure_cookies);
    Ok((
        jar,
        Json(AuthResponse {
            user: UserResponse::from_user(user),
            token_exp: exp,
        }),
    ))
}

// ── POST /api/auth/resend-otp ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResendOtpRequest {
    pub user_id: Uuid,
}

pub async fn resend_otp(
    State(state): State<AppState>,
    Json(body): Json<ResendOtpRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = ResendOtpUseCase {
        users: state.user_repo(),
        mailer: state.mailer.clone(),
    };
    usecase
        .execute(ResendOtpInput {
            user_id: body.user_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let (user, token, exp) = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    let jar = set_session_cookie(jar, token, state.secure_cookies);
    Ok((
        jar,
        Json(AuthResponse {
            user: UserResponse::from_user(user),
            token_exp: exp,
        }),
    ))
}

// ── POST /api/auth/logout ────────────────────────────────────────────────────

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    // Logout never fails; clearing an absent cookie is fine.
    let jar = clear_session_cookie(jar, state.secure_cookies);
    (StatusCode::NO_CONTENT, jar)
}

// ── GET /api/auth/is-auth ────────────────────────────────────────────────────

pub async fn is_auth(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = CurrentUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(session.user_id).await?;
    Ok(Json(UserResponse::from_user(user)))
}

// ── POST /api/auth/send-reset-otp ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendResetOtpRequest {
    pub email: String,
}

pub async fn send_reset_otp(
    State(state): State<AppState>,
    Json(body): Json<SendResetOtpRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = SendResetOtpUseCase {
        users: state.user_repo(),
        mailer: state.mailer.clone(),
    };
    usecase
        .execute(SendResetOtpInput { email: body.email })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/auth/reset-password ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = ResetPasswordUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(ResetPasswordInput {
            email: body.email,
            otp: body.otp,
            new_password: body.new_password,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

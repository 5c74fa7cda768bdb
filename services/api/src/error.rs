use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Api service domain error variants.
///
/// One typed convention for the whole surface: every failure maps to a
/// `{kind, message}` JSON body with a proper HTTP status (the source
/// system's `success:false`-with-200 auth responses are deliberately
/// normalized away).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("user not found")]
    UserNotFound,
    #[error("course not found")]
    CourseNotFound,
    #[error("lesson not found")]
    LessonNotFound,
    #[error("email already registered")]
    EmailTaken,
    #[error("already enrolled")]
    AlreadyEnrolled,
    #[error("account already verified")]
    AlreadyVerified,
    #[error("password must be at least 8 characters")]
    WeakPassword,
    #[error("invalid role")]
    InvalidRole,
    #[error("missing data")]
    MissingData,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("account not verified")]
    NotVerified,
    #[error("invalid otp")]
    InvalidOtp,
    #[error("otp expired")]
    OtpExpired,
    #[error("not enrolled")]
    NotEnrolled,
    #[error("forbidden")]
    Forbidden,
    #[error("cannot modify own account")]
    SelfModification,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::CourseNotFound => "COURSE_NOT_FOUND",
            Self::LessonNotFound => "LESSON_NOT_FOUND",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::AlreadyEnrolled => "ALREADY_ENROLLED",
            Self::AlreadyVerified => "ALREADY_VERIFIED",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::InvalidRole => "INVALID_ROLE",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotVerified => "NOT_VERIFIED",
            Self::InvalidOtp => "INVALID_OTP",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::NotEnrolled => "NOT_ENROLLED",
            Self::Forbidden => "FORBIDDEN",
            Self::SelfModification => "SELF_MODIFICATION",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound | Self::CourseNotFound | Self::LessonNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::EmailTaken | Self::AlreadyEnrolled | Self::AlreadyVerified => {
                StatusCode::CONFLICT
            }
            Self::WeakPassword | Self::InvalidRole | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::NotVerified | Self::InvalidOtp | Self::OtpExpired => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotEnrolled | Self::Forbidden | Self::SelfModification => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

pub mod admin;
pub mod auth;
pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod progress;

use opencourse_auth::session::Session;
use opencourse_domain::user::UserRole;

use crate::error::ApiError;

/// Reject non-admin sessions.
pub(crate) fn require_admin(session: &Session) -> Result<(), ApiError> {
    if session.user_role < UserRole::Admin.as_u8() {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

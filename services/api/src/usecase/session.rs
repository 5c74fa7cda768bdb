use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Verify credentials and issue a session token.
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    pub users: U,
    pub jwt_secret: String,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    /// Returns the user together with a session token and its expiry
    /// (unix seconds).
    pub async fn execute(&self, input: LoginInput) -> Result<(User, String, u64), ApiError> {
        let email = input.email.trim().to_lowercase();

        // Unknown email reads as invalid credentials, not 404, so login
        // does not leak which addresses have accounts.
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        // Unverified accounts are told so before the password is checked,
        // pointing the client at the verification flow.
        if !user.is_verified {
            return Err(ApiError::NotVerified);
        }

        let ok = bcrypt::verify(&input.password, &user.password_hash)
            .map_err(|e| ApiError::Internal(e.into()))?;
        if !ok {
            return Err(ApiError::InvalidCredentials);
        }

        let (token, exp) =
            opencourse_auth::token::issue_session_token(user.id, user.role, &self.jwt_secret)
                .map_err(|e| ApiError::Internal(e.into()))?;
        Ok((user, token, exp))
    }
}

/// Resolve the authenticated user's own account.
pub struct CurrentUserUseCase<U>
where
    U: UserRepository,
{
    pub users: U,
}

impl<U> CurrentUserUseCase<U>
where
    U: UserRepository,
{
    pub async fn execute(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

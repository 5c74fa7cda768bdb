use chrono::{Duration, Utc};

use opencourse_domain::user::MIN_PASSWORD_LEN;

use crate::domain::repository::{MailerPort, UserRepository};
use crate::domain::types::{OTP_TTL_SECS, OtpChallenge};
use crate::error::ApiError;
use crate::usecase::{BCRYPT_COST, generate_otp};

pub struct SendResetOtpInput {
    pub email: String,
}

/// Email a password-reset OTP to an existing account.
pub struct SendResetOtpUseCase<U, M>
where
    U: UserRepository,
    M: MailerPort,
{
    pub users: U,
    pub mailer: M,
}

impl<U, M> SendResetOtpUseCase<U, M>
where
    U: UserRepository,
    M: MailerPort,
{
    pub async fn execute(&self, input: SendResetOtpInput) -> Result<(), ApiError> {
        let email = input.email.trim().to_lowercase();

        // Unknown emails get an explicit 404 here. Unlike login, the reset
        // flow is only reachable by someone typing their own address.
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let otp = OtpChallenge {
            code: generate_otp(),
            expires_at: Utc::now() + Duration::seconds(OTP_TTL_SECS),
        };
        self.users.set_reset_otp(user.id, Some(&otp)).await?;
        self.mailer
            .send_reset_otp(&user.email, &user.name, &otp.code)
            .await?;
        Ok(())
    }
}

pub struct ResetPasswordInput {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

/// Check the reset OTP and replace the password hash.
pub struct ResetPasswordUseCase<U>
where
    U: UserRepository,
{
    pub users: U,
}

impl<U> ResetPasswordUseCase<U>
where
    U: UserRepository,
{
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<(), ApiError> {
        let email = input.email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        if input.new_password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::WeakPassword);
        }

        let otp = user.reset_otp.as_ref().ok_or(ApiError::InvalidOtp)?;
        if !otp.matches(&input.otp) {
            return Err(ApiError::InvalidOtp);
        }
        if otp.is_expired() {
            return Err(ApiError::OtpExpired);
        }

        let password_hash = bcrypt::hash(&input.new_password, BCRYPT_COST)
            .map_err(|e| ApiError::Internal(e.into()))?;

        // update_password clears the reset OTP, making it single-use.
        self.users.update_password(user.id, &password_hash).await?;
        Ok(())
    }
}

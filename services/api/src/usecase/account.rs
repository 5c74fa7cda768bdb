use chrono::{Duration, Utc};
use uuid::Uuid;

use opencourse_domain::user::{MIN_PASSWORD_LEN, UserRole};

use crate::domain::repository::{MailerPort, UserRepository};
use crate::domain::types::{OTP_TTL_SECS, OtpChallenge, User};
use crate::error::ApiError;
use crate::usecase::{BCRYPT_COST, generate_otp};

pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Optional shared secret elevating the new account to admin.
    pub admin_key: Option<String>,
}

/// Create an unverified account and email it a verification OTP.
pub struct RegisterUseCase<U, M>
where
    U: UserRepository,
    M: MailerPort,
{
    pub users: U,
    pub mailer: M,
    pub admin_key: String,
}

impl<U, M> RegisterUseCase<U, M>
where
    U: UserRepository,
    M: MailerPort,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<Uuid, ApiError> {
        let name = input.name.trim();
        let email = input.email.trim().to_lowercase();
        if name.is_empty() || email.is_empty() {
            return Err(ApiError::MissingData);
        }
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::WeakPassword);
        }

        // 1. Reject duplicate email → 409
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }

        // 2. Hash the password; only the hash is ever persisted
        let password_hash = bcrypt::hash(&input.password, BCRYPT_COST)
            .map_err(|e| ApiError::Internal(e.into()))?;

        // 3. Matching admin key elevates the account at creation time
        let role = match input.admin_key {
            Some(ref key) if *key == self.admin_key => UserRole::Admin,
            _ => UserRole::Student,
        };

        let now = Utc::now();
        let otp = OtpChallenge {
            code: generate_otp(),
            expires_at: now + Duration::seconds(OTP_TTL_SECS),
        };
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            email: email.clone(),
            password_hash,
            role: role.as_u8(),
            is_verified: false,
            otp: Some(otp.clone()),
            reset_otp: None,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;

        // 4. Send the OTP; account creation already succeeded, so a mail
        //    failure surfaces as 500 and the user can request a resend.
        self.mailer
            .send_verification_otp(&email, name, &otp.code)
            .await?;

        Ok(user.id)
    }
}

pub struct VerifyEmailInput {
    /// The id returned by registration.
    pub user_id: Uuid,
    pub otp: String,
}

/// Check the verification OTP, mark the account verified and log it in.
pub struct VerifyEmailUseCase<U>
where
    U: UserRepository,
{
    pub users: U,
    pub jwt_secret: String,
}

impl<U> VerifyEmailUseCase<U>
where
    U: UserRepository,
{
    /// Returns the verified user together with a fresh session token and
    /// its expiry (unix seconds).
    pub async fn execute(&self, input: VerifyEmailInput) -> Result<(User, String, u64), ApiError> {
        let user = self
            .users
            .find_by_id(input.user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if user.is_verified {
            return Err(ApiError::AlreadyVerified);
        }

        // OTPs are single-use: mark_verified clears the stored challenge.
        let otp = user.otp.as_ref().ok_or(ApiError::InvalidOtp)?;
        if !otp.matches(&input.otp) {
            return Err(ApiError::InvalidOtp);
        }
        if otp.is_expired() {
            return Err(ApiError::OtpExpired);
        }

        self.users.mark_verified(user.id).await?;

        let (token, exp) =
            opencourse_auth::token::issue_session_token(user.id, user.role, &self.jwt_secret)
                .map_err(|e| ApiError::Internal(e.into()))?;

        let user = User {
            is_verified: true,
            otp: None,
            ..user
        };
        Ok((user, token, exp))
    }
}

pub struct ResendOtpInput {
    pub user_id: Uuid,
}

/// Issue a fresh verification OTP for an unverified account.
pub struct ResendOtpUseCase<U, M>
where
    U: UserRepository,
    M: MailerPort,
{
    pub users: U,
    pub mailer: M,
}

impl<U, M> ResendOtpUseCase<U, M>
where
    U: UserRepository,
    M: MailerPort,
{
    pub async fn execute(&self, input: ResendOtpInput) -> Result<(), ApiError> {
        let user = self
            .users
            .find_by_id(input.user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if user.is_verified {
            return Err(ApiError::AlreadyVerified);
        }

        // Replaces any previous OTP; only the latest code is valid.
        let otp = OtpChallenge {
            code: generate_otp(),
            expires_at: Utc::now() + Duration::seconds(OTP_TTL_SECS),
        };
        self.users.set_otp(user.id, Some(&otp)).await?;
        self.mailer
            .send_verification_otp(&user.email, &user.name, &otp.code)
            .await?;
        Ok(())
    }
}

use anyhow::Context as _;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::domain::repository::MailerPort;
use crate::error::ApiError;

/// SMTP settings, present only when the deployment configures them.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: Option<String>,
}

impl SmtpConfig {
    /// Read SMTP settings from the environment. Returns `None` when any
    /// required variable (SMTP_HOST, SMTP_USERNAME, SMTP_PASSWORD,
    /// SMTP_FROM_EMAIL) is missing, in which case OTP delivery falls back
    /// to the console mailer.
    pub fn from_env() -> Option<Self> {
        fn get_env(key: &str) -> Option<String> {
            std::env::var(key).ok().filter(|s| !s.is_empty())
        }

        let host = get_env("SMTP_HOST")?;
        let username = get_env("SMTP_USERNAME")?;
        let password = get_env("SMTP_PASSWORD")?;
        let from_email = get_env("SMTP_FROM_EMAIL")?;
        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(465);
        let from_name = get_env("SMTP_FROM_NAME");

        Some(Self {
            host,
            port,
            username,
            password,
            from_email,
            from_name,
        })
    }
}

/// Production mailer delivering over SMTP.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Result<Self, ApiError> {
        let creds = Credentials::new(config.username, config.password);
        let transport = SmtpTransport::relay(&config.host)
            .context("create smtp transport")?
            .port(config.port)
            .credentials(creds)
            .build();
        let from = match &config.from_name {
            Some(name) => format!("{} <{}>", name, config.from_email),
            None => config.from_email.clone(),
        };
        tracing::info!(host = %config.host, port = config.port, "smtp mailer configured");
        Ok(Self { transport, from })
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), ApiError> {
        let message = Message::builder()
            .from(self.from.parse().context("parse from address")?)
            .to(to.parse().context("parse to address")?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .context("build email")?;

        // lettre's SmtpTransport is blocking; keep it off the runtime.
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .context("join smtp send task")?
            .context("send email")?;
        Ok(())
    }
}

impl MailerPort for SmtpMailer {
    async fn send_verification_otp(
        &self,
        email: &str,
        name: &str,
        otp: &str,
    ) -> Result<(), ApiError> {
        let body = format!(
            "Hi {name},\n\n\
             Your verification code is: {otp}\n\n\
             It expires in 10 minutes. If you didn't sign up, you can\n\
             safely ignore this email.",
        );
        self.send(email, "Verify your email", body).await?;
        tracing::info!(email = %email, "verification email sent");
        Ok(())
    }

    async fn send_reset_otp(&self, email: &str, name: &str, otp: &str) -> Result<(), ApiError> {
        let body = format!(
            "Hi {name},\n\n\
             Your password reset code is: {otp}\n\n\
             It expires in 10 minutes. If you didn't request a reset, you\n\
             can safely ignore this email.",
        );
        self.send(email, "Reset your password", body).await?;
        tracing::info!(email = %email, "password reset email sent");
        Ok(())
    }
}

/// Development mailer that logs OTPs instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct ConsoleMailer;

impl MailerPort for ConsoleMailer {
    async fn send_verification_otp(
        &self,
        email: &str,
        _name: &str,
        otp: &str,
    ) -> Result<(), ApiError> {
        tracing::info!(email = %email, otp = %otp, "verification otp (console mailer)");
        Ok(())
    }

    async fn send_reset_otp(&self, email: &str, _name: &str, otp: &str) -> Result<(), ApiError> {
        tracing::info!(email = %email, otp = %otp, "password reset otp (console mailer)");
        Ok(())
    }
}

/// Concrete mailer selected at startup. An enum rather than a trait object
/// because `MailerPort` is not dyn-compatible.
#[derive(Clone)]
pub enum AppMailer {
    Smtp(SmtpMailer),
    Console(ConsoleMailer),
}

impl MailerPort for AppMailer {
    async fn send_verification_otp(
        &self,
        email: &str,
        name: &str,
        otp: &str,
    ) -> Result<(), ApiError> {
        match self {
            Self::Smtp(m) => m.send_verification_otp(email, name, otp).await,
            Self::Console(m) => m.send_verification_otp(email, name, otp).await,
        }
    }

    async fn send_reset_otp(&self, email: &str, name: &str, otp: &str) -> Result<(), ApiError> {
        match self {
            Self::Smtp(m) => m.send_reset_otp(email, name, otp).await,
            Self::Console(m) => m.send_reset_otp(email, name, otp).await,
        }
    }
}

use sea_orm::Database;
use tracing::info;

use opencourse_api::config::ApiConfig;
use opencourse_api::infra::email::{AppMailer, ConsoleMailer, SmtpConfig, SmtpMailer};
use opencourse_api::router::build_router;
use opencourse_api::state::AppState;

#[tokio::main]
async fn main() {
    opencourse_core::tracing::init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer = match SmtpConfig::from_env() {
        Some(smtp) => AppMailer::Smtp(SmtpMailer::new(smtp).expect("failed to set up SMTP mailer")),
        None => {
            info!("SMTP not configured, using console mailer");
            AppMailer::Console(ConsoleMailer)
        }
    };

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
        admin_key: config.admin_key,
        secure_cookies: config.secure_cookies,
        mailer,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub admin_key: String,
    pub api_port: u16,
    /// Whether session cookies are flagged Secure (production deployments
    /// behind TLS). Derived from APP_ENV.
    pub secure_cookies: bool,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        let admin_key = std::env::var("ADMIN_KEY").expect("ADMIN_KEY must be set");
        let api_port = std::env::var("API_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(4000);
        let secure_cookies = std::env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        Self {
            database_url,
            jwt_secret,
            admin_key,
            api_port,
            secure_cookies,
        }
    }
}

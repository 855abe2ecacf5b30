use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum concurrent non-revoked sessions per user (default: `2`).
    /// A non-positive value denies all logins rather than allowing
    /// unlimited sessions.
    pub session_limit: i64,
    /// Password reset token lifetime in minutes (default: `60`).
    pub reset_token_ttl_mins: i64,
    /// Base URL used to construct reset links echoed in non-production
    /// responses (default: `http://localhost:3000`).
    pub reset_url_base: String,
    /// Deployment environment name (default: `development`). The literal
    /// value `production` disables reset-token echo.
    pub app_env: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8001`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SESSION_LIMIT`        | `2`                        |
    /// | `RESET_TOKEN_TTL_MINS` | `60`                       |
    /// | `RESET_URL_BASE`       | `http://localhost:3000`    |
    /// | `APP_ENV`              | `development`              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let session_limit: i64 = std::env::var("SESSION_LIMIT")
            .unwrap_or_else(|_| "2".into())
            .parse()
            .expect("SESSION_LIMIT must be a valid i64");

        let reset_token_ttl_mins: i64 = std::env::var("RESET_TOKEN_TTL_MINS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("RESET_TOKEN_TTL_MINS must be a valid i64");

        let reset_url_base =
            std::env::var("RESET_URL_BASE").unwrap_or_else(|_| "http://localhost:3000".into());

        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            session_limit,
            reset_token_ttl_mins,
            reset_url_base,
            app_env,
            jwt,
        }
    }

    /// Whether the server runs in production mode.
    ///
    /// Controls whether reset tokens are echoed back to the caller.
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}

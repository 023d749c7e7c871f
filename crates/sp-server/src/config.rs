//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible defaults.
//! Token secrets are required; everything else falls back to a default
//! suitable for local development.

use sp_auth::{AdminCredentials, TokenConfig};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host to bind to.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Database connection URL.
    pub database_url: String,

    /// Minimum database connections.
    pub db_min_connections: u32,

    /// Maximum database connections.
    pub db_max_connections: u32,

    /// Token issuance configuration.
    pub tokens: TokenConfig,

    /// Local admin credential, when configured.
    pub admin: Option<AdminCredentials>,

    /// CORS allowed origins (comma-separated).
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL`, `JWT_SECRET`, or `JWT_REFRESH_SECRET`
    /// is missing.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let host = std::env::var("SP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("SP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let db_min_connections = std::env::var("SP_DB_MIN_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);

        let db_max_connections = std::env::var("SP_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let access_secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        let refresh_secret = std::env::var("JWT_REFRESH_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_REFRESH_SECRET environment variable is required"))?;

        let access_expiration =
            std::env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| "1h".to_string());
        let refresh_expiration =
            std::env::var("JWT_REFRESH_EXPIRES_IN").unwrap_or_else(|_| "7d".to_string());

        let rotate_refresh = std::env::var("JWT_REFRESH_ROTATION")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(false);

        let tokens = TokenConfig {
            access_secret,
            refresh_secret,
            access_expiration,
            refresh_expiration,
            rotate_refresh,
        };

        // The admin login is enabled only when both variables are set.
        let admin = match (
            std::env::var("ADMIN_USERNAME"),
            std::env::var("ADMIN_PASSWORD_HASH"),
        ) {
            (Ok(username), Ok(password_hash)) => Some(AdminCredentials {
                username,
                password_hash,
            }),
            _ => None,
        };

        let cors_origins = std::env::var("SP_CORS_ORIGINS")
            .map(|s| s.split(',').map(str::trim).map(String::from).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        Ok(Self {
            host,
            port,
            database_url,
            db_min_connections,
            db_max_connections,
            tokens,
            admin,
            cors_origins,
        })
    }

    /// Creates a configuration for testing.
    #[must_use]
    pub fn for_testing(database_url: &str) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
            database_url: database_url.to_string(),
            db_min_connections: 1,
            db_max_connections: 5,
            tokens: TokenConfig {
                access_secret: "test-access-secret".to_string(),
                refresh_secret: "test-refresh-secret".to_string(),
                access_expiration: "1h".to_string(),
                refresh_expiration: "7d".to_string(),
                rotate_refresh: false,
            },
            admin: None,
            cors_origins: vec!["*".to_string()],
        }
    }
}
